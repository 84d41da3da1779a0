use anyhow::Result;
use sqlx::{Executor, MySql, Pool};

use crate::{
    db::MysqlDb,
    model::ranking::{RankingAggregateModel, RankingModel},
};

// `datetime(6)` rather than `timestamp(6)`: with explicit_defaults_for_timestamp
// off, the first timestamp column silently gets ON UPDATE CURRENT_TIMESTAMP,
// which would rewrite `created_at` on every update.
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS `rankings` (`id` varchar(36) NOT NULL, `created_at` datetime(6) NOT NULL, `updated_at` datetime(6) NOT NULL, `name` text NOT NULL, `score` bigint NOT NULL, `level` text NOT NULL, PRIMARY KEY (`id`), INDEX `rankings_score_idx` (`score`, `created_at`))";
const INSERT: &str = "INSERT INTO `rankings` (`id`, `created_at`, `updated_at`, `name`, `score`, `level`) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT: &str = "SELECT `id`, `created_at`, `updated_at`, `name`, `score`, `level` FROM `rankings` WHERE `id` = ?";
const SELECT_MANY_TOP: &str = "SELECT `id`, `created_at`, `updated_at`, `name`, `score`, `level` FROM `rankings` ORDER BY `score` DESC, `created_at` ASC, `id` ASC LIMIT ?";
const COUNT: &str = "SELECT COUNT(1) FROM `rankings`";
const COUNT_AT_OR_ABOVE: &str = "SELECT COUNT(1) FROM `rankings` WHERE `score` >= ?";
const AGGREGATE: &str = "SELECT COUNT(1) AS `total`, COALESCE(MAX(`score`), 0) AS `highest`, CAST(COALESCE(SUM(`score`), 0) AS SIGNED) AS `sum` FROM `rankings`";
const UPDATE: &str = "UPDATE `rankings` SET `updated_at` = ?, `name` = ?, `score` = ?, `level` = ? WHERE `id` = ?";
const DELETE: &str = "DELETE FROM `rankings` WHERE `id` = ?";
const DELETE_ALL: &str = "DELETE FROM `rankings`";
// MySQL rejects LIMIT inside IN subqueries and self-referencing deletes, so the
// overflow ids go through a derived table.
const DELETE_OVERFLOW: &str = "DELETE FROM `rankings` WHERE `id` IN (SELECT `id` FROM (SELECT `id` FROM `rankings` ORDER BY `score` DESC, `created_at` ASC, `id` ASC LIMIT 18446744073709551615 OFFSET ?) AS `overflow`)";

pub async fn init(pool: &Pool<MySql>) -> Result<()> {
    jg_log::info(Some("🔧"), "[MySQL] Setting up rankings table");

    pool.execute(CREATE_TABLE).await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(SELECT),
        pool.prepare(SELECT_MANY_TOP),
        pool.prepare(COUNT),
        pool.prepare(COUNT_AT_OR_ABOVE),
        pool.prepare(AGGREGATE),
        pool.prepare(UPDATE),
        pool.prepare(DELETE),
        pool.prepare(DELETE_ALL),
        pool.prepare(DELETE_OVERFLOW),
    )?;

    Ok(())
}

impl MysqlDb {
    pub async fn insert_ranking(&self, value: &RankingModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.created_at())
                .bind(value.updated_at())
                .bind(value.name())
                .bind(value.score())
                .bind(value.level()),
        )
        .await?;

        self.delete_overflow_rankings().await
    }

    pub async fn select_ranking(&self, id: &str) -> Result<Option<RankingModel>> {
        Ok(self.fetch_optional(sqlx::query_as(SELECT).bind(id)).await?)
    }

    pub async fn select_many_top_rankings(&self, limit: &i64) -> Result<Vec<RankingModel>> {
        Ok(self
            .fetch_all(sqlx::query_as(SELECT_MANY_TOP).bind(limit))
            .await?)
    }

    pub async fn count_rankings(&self) -> Result<i64> {
        Ok(self.fetch_one::<(i64,)>(sqlx::query_as(COUNT)).await?.0)
    }

    pub async fn count_rankings_at_or_above(&self, score: &i64) -> Result<i64> {
        Ok(self
            .fetch_one::<(i64,)>(sqlx::query_as(COUNT_AT_OR_ABOVE).bind(score))
            .await?
            .0)
    }

    pub async fn select_ranking_aggregate(&self) -> Result<RankingAggregateModel> {
        Ok(self.fetch_one(sqlx::query_as(AGGREGATE)).await?)
    }

    pub async fn update_ranking(&self, value: &RankingModel) -> Result<u64> {
        Ok(self
            .execute(
                sqlx::query(UPDATE)
                    .bind(value.updated_at())
                    .bind(value.name())
                    .bind(value.score())
                    .bind(value.level())
                    .bind(value.id()),
            )
            .await?
            .rows_affected())
    }

    pub async fn delete_ranking(&self, id: &str) -> Result<u64> {
        Ok(self
            .execute(sqlx::query(DELETE).bind(id))
            .await?
            .rows_affected())
    }

    pub async fn delete_all_rankings(&self) -> Result<u64> {
        Ok(self.execute(sqlx::query(DELETE_ALL)).await?.rows_affected())
    }

    async fn delete_overflow_rankings(&self) -> Result<()> {
        if let Some(max_entries) = self.ranking_max_entries() {
            let removed = self
                .execute(sqlx::query(DELETE_OVERFLOW).bind(max_entries))
                .await?
                .rows_affected();
            if removed > 0 {
                jg_log::debug(
                    None,
                    format!("[MySQL] Trimmed {removed} rankings beyond top {max_entries}"),
                );
            }
        }
        Ok(())
    }
}
