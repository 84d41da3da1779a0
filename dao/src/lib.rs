use jg_db_mysql::db::MysqlDb;
use jg_db_postgresql::db::PostgresDb;
use jg_db_sqlite::db::SqliteDb;

pub mod base;
pub mod ranking;
mod util;

pub enum Db {
    PostgresqlDb(PostgresDb),
    MysqlDb(MysqlDb),
    SqliteDb(SqliteDb),
}

impl Db {
    pub fn driver_name(&self) -> &str {
        match self {
            Self::PostgresqlDb(_) => "PostgreSQL",
            Self::MysqlDb(_) => "MySQL",
            Self::SqliteDb(_) => "SQLite",
        }
    }

    /// Upper bound on stored rankings, `None` when unbounded.
    pub fn ranking_max_entries(&self) -> &Option<i64> {
        match self {
            Self::PostgresqlDb(db) => db.ranking_max_entries(),
            Self::MysqlDb(db) => db.ranking_max_entries(),
            Self::SqliteDb(db) => db.ranking_max_entries(),
        }
    }

    /// Whether an entry placed at `position` survives the trim after insert.
    pub fn ranking_keeps_position(&self, position: &i64) -> bool {
        match self.ranking_max_entries() {
            Some(max_entries) => *position <= *max_entries,
            None => true,
        }
    }
}
