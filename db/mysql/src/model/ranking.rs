use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;

#[derive(FromRow)]
pub struct RankingModel {
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    name: String,
    score: i64,
    level: String,
}

impl RankingModel {
    pub fn new(
        id: &str,
        created_at: &DateTime<Utc>,
        updated_at: &DateTime<Utc>,
        name: &str,
        score: &i64,
        level: &str,
    ) -> Self {
        Self {
            id: id.to_owned(),
            created_at: *created_at,
            updated_at: *updated_at,
            name: name.to_owned(),
            score: *score,
            level: level.to_owned(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> &i64 {
        &self.score
    }

    pub fn level(&self) -> &str {
        &self.level
    }
}

#[derive(FromRow)]
pub struct RankingAggregateModel {
    total: i64,
    highest: i64,
    sum: i64,
}

impl RankingAggregateModel {
    pub fn total(&self) -> &i64 {
        &self.total
    }

    pub fn highest(&self) -> &i64 {
        &self.highest
    }

    pub fn sum(&self) -> &i64 {
        &self.sum
    }
}
