use anyhow::Result;
use sqlx::{
    postgres::{PgArguments, PgPoolOptions, PgQueryResult, PgRow},
    query::{Query, QueryAs},
    Error, Pool, Postgres,
};

use crate::query::ranking;

pub struct PostgresDb {
    pool: Pool<Postgres>,
    ranking_max_entries: Option<i64>,
}

impl PostgresDb {
    pub async fn new(
        url: &str,
        max_connections: &u32,
        ranking_max_entries: &Option<u32>,
    ) -> Result<Self> {
        if *ranking_max_entries == Some(0) {
            return Err(anyhow::Error::msg("Ranking max entries must be at least 1"));
        }

        jg_log::info(Some("⚡"), "[PostgreSQL] Initializing component");

        let pool = PgPoolOptions::new()
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
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, Error> {
        query.execute(&self.pool).await
    }

    pub async fn fetch_one<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<T, Error> {
        query.fetch_one(&self.pool).await
    }

    pub async fn fetch_optional<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<Option<T>, Error> {
        query.fetch_optional(&self.pool).await
    }

    pub async fn fetch_all<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<Vec<T>, Error> {
        query.fetch_all(&self.pool).await
    }

    pub fn ranking_max_entries(&self) -> &Option<i64> {
        &self.ranking_max_entries
    }

    async fn init(pool: &Pool<Postgres>) -> Result<()> {
        ranking::init(pool).await
    }
}
