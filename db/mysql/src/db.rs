use anyhow::Result;
use sqlx::{
    mysql::{MySqlArguments, MySqlPoolOptions, MySqlQueryResult, MySqlRow},
    query::{Query, QueryAs},
    Error, MySql, Pool,
};

use crate::query::ranking;

pub struct MysqlDb {
    pool: Pool<MySql>,
    ranking_max_entries: Option<i64>,
}

impl MysqlDb {
    pub async fn new(
        url: &str,
        max_connections: &u32,
        ranking_max_entries: &Option<u32>,
    ) -> Result<Self> {
        if *ranking_max_entries == Some(0) {
            return Err(anyhow::Error::msg("Ranking max entries must be at least 1"));
        }

        jg_log::info(Some("⚡"), "[MySQL] Initializing component");

        let pool = MySqlPoolOptions::new()
            .max_connections(*max_connections)
            .connect(url)
            .await?;

        Self::init(&pool).await?;

        Ok(Self {
            pool,
            ranking_max_entries: ranking_max_entries.map(i64::from),
        })
    }

    pub async fn execute(
        &self,
        query: Query<'_, MySql, MySqlArguments>,
    ) -> Result<MySqlQueryResult, Error> {
        query.execute(&self.pool).await
    }

    pub async fn fetch_one<T: Send + Unpin + for<'r> sqlx::FromRow<'r, MySqlRow>>(
        &self,
        query: QueryAs<'_, MySql, T, MySqlArguments>,
    ) -> Result<T, Error> {
        query.fetch_one(&self.pool).await
    }

    pub async fn fetch_optional<T: Send + Unpin + for<'r> sqlx::FromRow<'r, MySqlRow>>(
        &self,
        query: QueryAs<'_, MySql, T, MySqlArguments>,
    ) -> Result<Option<T>, Error> {
        query.fetch_optional(&self.pool).await
    }

    pub async fn fetch_all<T: Send + Unpin + for<'r> sqlx::FromRow<'r, MySqlRow>>(
        &self,
        query: QueryAs<'_, MySql, T, MySqlArguments>,
    ) -> Result<Vec<T>, Error> {
        query.fetch_all(&self.pool).await
    }

    pub fn ranking_max_entries(&self) -> &Option<i64> {
        &self.ranking_max_entries
    }

    async fn init(pool: &Pool<MySql>) -> Result<()> {
        ranking::init(pool).await
    }
}
