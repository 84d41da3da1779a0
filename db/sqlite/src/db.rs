use anyhow::Result;
use sqlx::{
    query::{Query, QueryAs},
    sqlite::{SqliteArguments, SqlitePoolOptions, SqliteQueryResult, SqliteRow},
    Error, Pool, Sqlite,
};

use crate::query::ranking;

pub struct SqliteDb {
    pool: Pool<Sqlite>,
    ranking_max_entries: Option<i64>,
}

impl SqliteDb {
    pub async fn new(
        url: &str,
        max_connections: &u32,
        ranking_max_entries: &Option<u32>,
    ) -> Result<Self> {
        if *ranking_max_entries == Some(0) {
            return Err(anyhow::Error::msg("Ranking max entries must be at least 1"));
        }

        jg_log::info(Some("⚡"), "[SQLite] Initializing component");

        let pool = SqlitePoolOptions::new()
            .max_connections(*max_connections)
            .connect(url)
            .await?;

        Self::init(&pool).await?;

        Ok(Self {
            pool,
            ranking_max_entries: ranking_max_entries.map(i64::from),
        })
    }

    pub async fn execute<'a>(
        &self,
        query: Query<'a, Sqlite, SqliteArguments<'a>>,
    ) -> Result<SqliteQueryResult, Error> {
        query.execute(&self.pool).await
    }

    pub async fn fetch_one<'a, T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>>(
        &self,
        query: QueryAs<'a, Sqlite, T, SqliteArguments<'a>>,
    ) -> Result<T, Error> {
        query.fetch_one(&self.pool).await
    }

    pub async fn fetch_optional<'a, T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>>(
        &self,
        query: QueryAs<'a, Sqlite, T, SqliteArguments<'a>>,
    ) -> Result<Option<T>, Error> {
        query.fetch_optional(&self.pool).await
    }

    pub async fn fetch_all<'a, T: Send + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow>>(
        &self,
        query: QueryAs<'a, Sqlite, T, SqliteArguments<'a>>,
    ) -> Result<Vec<T>, Error> {
        query.fetch_all(&self.pool).await
    }

    pub fn ranking_max_entries(&self) -> &Option<i64> {
        &self.ranking_max_entries
    }

    async fn init(pool: &Pool<Sqlite>) -> Result<()> {
        ranking::init(pool).await
    }
}
