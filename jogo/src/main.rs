use std::process::ExitCode;

use anyhow::{Error, Result};
use clap::Parser;
use jg_config::Config;
use jg_dao::{
    base::BaseModel,
    ranking::{RankingDao, RankingStats},
    Db,
};
use jg_db_mysql::db::MysqlDb;
use jg_db_postgresql::db::PostgresDb;
use jg_db_sqlite::db::SqliteDb;

use crate::cli::{Cli, Command};

mod cli;
mod config_path;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_path::get(&cli.config).and_then(|path| jg_config::from_path(&path))
    {
        Ok(config) => config,
        Err(err) => {
            eprintln!("☠️ [Jogo] {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = jg_log::init(config.log().display_level(), config.log().level_filter()) {
        eprintln!("☠️ [Jogo] {err}");
        return ExitCode::FAILURE;
    }

    jg_log::info(Some("🚀"), "[Jogo] Starting");

    let db = match connect(&config).await {
        Ok(db) => db,
        Err(err) => {
            jg_log::error(None, format!("[Jogo] Connecting to database failed: {err}"));
            return ExitCode::FAILURE;
        }
    };

    jg_log::debug(None, format!("[Jogo] Using {} storage", db.driver_name()));

    match run(&db, cli.command).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            jg_log::error(None, format!("[Jogo] {err}"));
            ExitCode::FAILURE
        }
    }
}

async fn connect(config: &Config) -> Result<Db> {
    let max_entries = config.ranking().max_entries();
    if let Some(postgres) = config.db().postgres() {
        Ok(Db::PostgresqlDb(
            PostgresDb::new(&postgres.url(), postgres.max_connections(), max_entries).await?,
        ))
    } else if let Some(mysql) = config.db().mysql() {
        Ok(Db::MysqlDb(
            MysqlDb::new(&mysql.url(), mysql.max_connections(), max_entries).await?,
        ))
    } else if let Some(sqlite) = config.db().sqlite() {
        Ok(Db::SqliteDb(
            SqliteDb::new(&sqlite.url(), sqlite.max_connections(), max_entries).await?,
        ))
    } else {
        Err(Error::msg("No database configuration is specified"))
    }
}

async fn run(db: &Db, command: Command) -> Result<()> {
    match command {
        Command::Add { name, score, level } => {
            let position = RankingDao::db_position(db, &score).await?;
            let mut ranking = RankingDao::new(&name, &score, &level)?;
            ranking.db_insert(db).await?;
            if !db.ranking_keeps_position(&position) {
                jg_log::info(
                    None,
                    format!("[Jogo] {} pts did not make the ranking", ranking.score()),
                );
                println!("{} pts did not make the ranking", ranking.score());
                return Ok(());
            }
            jg_log::info(
                Some("🏆"),
                format!("[Jogo] New entry: {} - {} pts", ranking.name(), ranking.score()),
            );
            println!("#{position} {}", format_entry(&ranking));
        }
        Command::Show { id } => {
            let ranking = RankingDao::db_select(db, &id).await?;
            println!("{}", format_entry(&ranking));
            println!("  created {}", ranking.created_at().to_rfc3339());
            println!("  updated {}", ranking.updated_at().to_rfc3339());
        }
        Command::Top { count } => {
            let rankings = RankingDao::db_select_many_top(db, &count).await?;
            if rankings.is_empty() {
                println!("No entries yet");
            }
            for (idx, ranking) in rankings.iter().enumerate() {
                println!("#{} {}", idx + 1, format_entry(ranking));
            }
        }
        Command::Rename { id, name } => {
            let mut ranking = RankingDao::db_select(db, &id).await?;
            ranking.set_name(&name);
            ranking.db_update(db).await?;
            println!("{}", format_entry(&ranking));
        }
        Command::Remove { id } => {
            RankingDao::db_delete(db, &id).await?;
            println!("Removed {id}");
        }
        Command::Clear => {
            let removed = RankingDao::db_delete_all(db).await?;
            jg_log::warn(Some("🗑️"), format!("[Jogo] Cleared {removed} entries"));
            println!("Removed {removed} entries");
        }
        Command::Position { score } => {
            println!("#{}", RankingDao::db_position(db, &score).await?);
        }
        Command::HighScore { score } => {
            println!("{}", RankingDao::db_is_high_score(db, &score).await?);
        }
        Command::Stats => println!("{}", format_stats(&RankingDao::db_stats(db).await?)),
    }
    Ok(())
}

fn format_entry(ranking: &RankingDao) -> String {
    format!(
        "{} {} {} pts ({}) on {}",
        ranking.id(),
        ranking.name(),
        ranking.score(),
        ranking.level(),
        ranking.created_at().format("%Y-%m-%d"),
    )
}

fn format_stats(stats: &RankingStats) -> String {
    format!(
        "players: {}, highest: {}, average: {}",
        stats.total_players(),
        stats.highest_score(),
        stats.average_score()
    )
}
