use serde::Deserialize;

use self::{mysql::DbMysqlConfig, postgres::DbPostgresConfig, sqlite::DbSqliteConfig};

pub mod mysql;
pub mod postgres;
pub mod sqlite;

#[derive(Deserialize)]
pub struct DbConfig {
    postgres: Option<DbPostgresConfig>,
    mysql: Option<DbMysqlConfig>,
    sqlite: Option<DbSqliteConfig>,
}

impl DbConfig {
    pub fn postgres(&self) -> &Option<DbPostgresConfig> {
        &self.postgres
    }

    pub fn mysql(&self) -> &Option<DbMysqlConfig> {
        &self.mysql
    }

    pub fn sqlite(&self) -> &Option<DbSqliteConfig> {
        &self.sqlite
    }
}
