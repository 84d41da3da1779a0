use clap::{Parser, Subcommand};
use uuid::Uuid;

/// High-score ranking store for the Space Engineer game.
#[derive(Parser)]
#[command(name = "jogo", version)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, env = "JOGO_CONFIG_PATH", default_value = "config.yml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Record a finished game.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        score: i64,
        #[arg(long)]
        level: String,
    },
    /// Show a single entry.
    Show { id: Uuid },
    /// List the best entries.
    Top {
        #[arg(long, default_value_t = 10)]
        count: u32,
    },
    /// Change the player name of an entry.
    Rename { id: Uuid, name: String },
    /// Delete one entry.
    Remove { id: Uuid },
    /// Delete every entry.
    Clear,
    /// Place a score would take in the ranking.
    Position { score: i64 },
    /// Whether a score would enter the ranking.
    HighScore { score: i64 },
    /// Totals over the ranking.
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add() {
        let cli = Cli::try_parse_from([
            "jogo", "add", "--name", "Ripley", "--score", "1500", "--level", "level-3",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Add {
                name: "Ripley".to_owned(),
                score: 1500,
                level: "level-3".to_owned(),
            }
        );
    }

    #[test]
    fn top_defaults_to_ten() {
        let cli = Cli::try_parse_from(["jogo", "--config", "jogo.yml", "top"]).unwrap();
        assert_eq!(cli.config, "jogo.yml");
        assert_eq!(cli.command, Command::Top { count: 10 });
    }

    #[test]
    fn ids_must_be_uuids() {
        assert!(Cli::try_parse_from(["jogo", "show", "42"]).is_err());
        let id = Uuid::new_v4();
        let cli = Cli::try_parse_from(["jogo", "remove", &id.to_string()]).unwrap();
        assert_eq!(cli.command, Command::Remove { id });
    }

    #[test]
    fn high_score_uses_kebab_case() {
        let cli = Cli::try_parse_from(["jogo", "high-score", "300"]).unwrap();
        assert_eq!(cli.command, Command::HighScore { score: 300 });
    }
}
