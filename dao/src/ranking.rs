use anyhow::{Error, Result};
use jg_db_mysql::model::ranking::{
    RankingAggregateModel as RankingAggregateMysqlModel, RankingModel as RankingMysqlModel,
};
use jg_db_postgresql::model::ranking::{
    RankingAggregateModel as RankingAggregatePostgresModel, RankingModel as RankingPostgresModel,
};
use jg_db_sqlite::model::ranking::{
    RankingAggregateModel as RankingAggregateSqliteModel, RankingModel as RankingSqliteModel,
};
use uuid::Uuid;

use crate::{
    base::{BaseDao, BaseModel},
    util::conversion,
    Db,
};

pub const ANONYMOUS_NAME: &str = "Anônimo";

pub struct RankingDao {
    base: BaseDao,
    name: String,
    score: i64,
    level: String,
}

impl BaseModel for RankingDao {
    fn base(&self) -> &BaseDao {
        &self.base
    }
}

impl RankingDao {
    pub fn new(name: &str, score: &i64, level: &str) -> Result<Self> {
        Ok(Self {
            base: BaseDao::new(),
            name: Self::normalize_name(name),
            score: Self::validate_score(score)?,
            level: level.to_owned(),
        })
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

    pub fn set_name(&mut self, name: &str) {
        self.name = Self::normalize_name(name);
    }

    pub fn set_score(&mut self, score: &i64) -> Result<()> {
        self.score = Self::validate_score(score)?;
        Ok(())
    }

    pub fn set_level(&mut self, level: &str) {
        self.level = level.to_owned();
    }

    pub async fn db_insert(&mut self, db: &Db) -> Result<()> {
        let base = self.base.stamped_for_insert();
        match db {
            Db::PostgresqlDb(db) => db.insert_ranking(&self.to_postgresdb_model(&base)).await?,
            Db::MysqlDb(db) => db.insert_ranking(&self.to_mysqldb_model(&base)).await?,
            Db::SqliteDb(db) => db.insert_ranking(&self.to_sqlitedb_model(&base)).await?,
        }
        self.base = base;
        Ok(())
    }

    pub async fn db_select(db: &Db, id: &Uuid) -> Result<Self> {
        let id_str = conversion::uuid_to_string(id);
        let ranking = match db {
            Db::PostgresqlDb(db) => match db.select_ranking(&id_str).await? {
                Some(model) => Some(Self::from_postgresdb_model(&model)?),
                None => None,
            },
            Db::MysqlDb(db) => match db.select_ranking(&id_str).await? {
                Some(model) => Some(Self::from_mysqldb_model(&model)?),
                None => None,
            },
            Db::SqliteDb(db) => match db.select_ranking(&id_str).await? {
                Some(model) => Some(Self::from_sqlitedb_model(&model)?),
                None => None,
            },
        };
        ranking.ok_or_else(|| Self::not_found(id))
    }

    /// Best `count` entries, highest score first and oldest first on ties.
    pub async fn db_select_many_top(db: &Db, count: &u32) -> Result<Vec<Self>> {
        let limit = i64::from(*count);
        match db {
            Db::PostgresqlDb(db) => {
                let rankings = db.select_many_top_rankings(&limit).await?;
                let mut rankings_data = Vec::with_capacity(rankings.len());
                for ranking in &rankings {
                    rankings_data.push(Self::from_postgresdb_model(ranking)?);
                }
                Ok(rankings_data)
            }
            Db::MysqlDb(db) => {
                let rankings = db.select_many_top_rankings(&limit).await?;
                let mut rankings_data = Vec::with_capacity(rankings.len());
                for ranking in &rankings {
                    rankings_data.push(Self::from_mysqldb_model(ranking)?);
                }
                Ok(rankings_data)
            }
            Db::SqliteDb(db) => {
                let rankings = db.select_many_top_rankings(&limit).await?;
                let mut rankings_data = Vec::with_capacity(rankings.len());
                for ranking in &rankings {
                    rankings_data.push(Self::from_sqlitedb_model(ranking)?);
                }
                Ok(rankings_data)
            }
        }
    }

    pub async fn db_update(&mut self, db: &Db) -> Result<()> {
        let base = self.base.stamped_for_update();
        let updated = match db {
            Db::PostgresqlDb(db) => db.update_ranking(&self.to_postgresdb_model(&base)).await?,
            Db::MysqlDb(db) => db.update_ranking(&self.to_mysqldb_model(&base)).await?,
            Db::SqliteDb(db) => db.update_ranking(&self.to_sqlitedb_model(&base)).await?,
        };
        if updated == 0 {
            return Err(Self::not_found(self.base.id()));
        }
        self.base = base;
        Ok(())
    }

    pub async fn db_delete(db: &Db, id: &Uuid) -> Result<()> {
        let id_str = conversion::uuid_to_string(id);
        let deleted = match db {
            Db::PostgresqlDb(db) => db.delete_ranking(&id_str).await?,
            Db::MysqlDb(db) => db.delete_ranking(&id_str).await?,
            Db::SqliteDb(db) => db.delete_ranking(&id_str).await?,
        };
        if deleted == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    /// Clears the ranking and returns how many entries were removed.
    pub async fn db_delete_all(db: &Db) -> Result<u64> {
        match db {
            Db::PostgresqlDb(db) => db.delete_all_rankings().await,
            Db::MysqlDb(db) => db.delete_all_rankings().await,
            Db::SqliteDb(db) => db.delete_all_rankings().await,
        }
    }

    pub async fn db_count(db: &Db) -> Result<i64> {
        match db {
            Db::PostgresqlDb(db) => db.count_rankings().await,
            Db::MysqlDb(db) => db.count_rankings().await,
            Db::SqliteDb(db) => db.count_rankings().await,
        }
    }

    /// Whether `score` would earn a place in the ranking.
    pub async fn db_is_high_score(db: &Db, score: &i64) -> Result<bool> {
        let max_entries = match db.ranking_max_entries() {
            Some(max_entries) => *max_entries,
            None => return Ok(true),
        };
        if Self::db_count(db).await? < max_entries {
            return Ok(true);
        }
        let count = u32::try_from(max_entries)?;
        let rankings = Self::db_select_many_top(db, &count).await?;
        Ok(rankings.last().is_some_and(|lowest| *score > lowest.score))
    }

    /// 1-based place `score` would take; ties go behind existing entries.
    pub async fn db_position(db: &Db, score: &i64) -> Result<i64> {
        let ahead = match db {
            Db::PostgresqlDb(db) => db.count_rankings_at_or_above(score).await?,
            Db::MysqlDb(db) => db.count_rankings_at_or_above(score).await?,
            Db::SqliteDb(db) => db.count_rankings_at_or_above(score).await?,
        };
        Ok(ahead + 1)
    }

    pub async fn db_stats(db: &Db) -> Result<RankingStats> {
        match db {
            Db::PostgresqlDb(db) => Ok(RankingStats::from_postgresdb_model(
                &db.select_ranking_aggregate().await?,
            )),
            Db::MysqlDb(db) => Ok(RankingStats::from_mysqldb_model(
                &db.select_ranking_aggregate().await?,
            )),
            Db::SqliteDb(db) => Ok(RankingStats::from_sqlitedb_model(
                &db.select_ranking_aggregate().await?,
            )),
        }
    }

    fn normalize_name(name: &str) -> String {
        match name.trim() {
            "" => ANONYMOUS_NAME.to_owned(),
            name => name.to_owned(),
        }
    }

    fn validate_score(score: &i64) -> Result<i64> {
        if *score < 0 {
            return Err(Error::msg(format!("Score must not be negative, got {score}")));
        }
        Ok(*score)
    }

    fn not_found(id: &Uuid) -> Error {
        Error::msg(format!("Ranking entry '{id}' not found"))
    }

    fn from_postgresdb_model(model: &RankingPostgresModel) -> Result<Self> {
        Ok(Self {
            base: BaseDao::from_stored(model.id(), model.created_at(), model.updated_at())?,
            name: model.name().to_owned(),
            score: *model.score(),
            level: model.level().to_owned(),
        })
    }

    fn to_postgresdb_model(&self, base: &BaseDao) -> RankingPostgresModel {
        RankingPostgresModel::new(
            &base.id_string(),
            base.created_at(),
            base.updated_at(),
            &self.name,
            &self.score,
            &self.level,
        )
    }

    fn from_mysqldb_model(model: &RankingMysqlModel) -> Result<Self> {
        Ok(Self {
            base: BaseDao::from_stored(model.id(), model.created_at(), model.updated_at())?,
            name: model.name().to_owned(),
            score: *model.score(),
            level: model.level().to_owned(),
        })
    }

    fn to_mysqldb_model(&self, base: &BaseDao) -> RankingMysqlModel {
        RankingMysqlModel::new(
            &base.id_string(),
            base.created_at(),
            base.updated_at(),
            &self.name,
            &self.score,
            &self.level,
        )
    }

    fn from_sqlitedb_model(model: &RankingSqliteModel) -> Result<Self> {
        Ok(Self {
            base: BaseDao::from_stored(model.id(), model.created_at(), model.updated_at())?,
            name: model.name().to_owned(),
            score: *model.score(),
            level: model.level().to_owned(),
        })
    }

    fn to_sqlitedb_model(&self, base: &BaseDao) -> RankingSqliteModel {
        RankingSqliteModel::new(
            &base.id_string(),
            base.created_at(),
            base.updated_at(),
            &self.name,
            &self.score,
            &self.level,
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RankingStats {
    total_players: i64,
    highest_score: i64,
    average_score: i64,
}

impl RankingStats {
    pub fn total_players(&self) -> &i64 {
        &self.total_players
    }

    pub fn highest_score(&self) -> &i64 {
        &self.highest_score
    }

    /// Mean score rounded down.
    pub fn average_score(&self) -> &i64 {
        &self.average_score
    }

    fn new(total: &i64, highest: &i64, sum: &i64) -> Self {
        Self {
            total_players: *total,
            highest_score: *highest,
            average_score: if *total == 0 {
                0
            } else {
                sum.div_euclid(*total)
            },
        }
    }

    fn from_postgresdb_model(model: &RankingAggregatePostgresModel) -> Self {
        Self::new(model.total(), model.highest(), model.sum())
    }

    fn from_mysqldb_model(model: &RankingAggregateMysqlModel) -> Self {
        Self::new(model.total(), model.highest(), model.sum())
    }

    fn from_sqlitedb_model(model: &RankingAggregateSqliteModel) -> Self {
        Self::new(model.total(), model.highest(), model.sum())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::test_util::sqlite_db;

    async fn add(db: &Db, name: &str, score: i64) -> RankingDao {
        let mut ranking = RankingDao::new(name, &score, "level-1").unwrap();
        ranking.db_insert(db).await.unwrap();
        ranking
    }

    #[test]
    fn new_entry_trims_name_and_defaults_to_anonymous() {
        let ranking = RankingDao::new("  Ripley  ", &10, "level-2").unwrap();
        assert_eq!(ranking.name(), "Ripley");
        assert_eq!(RankingDao::new("   ", &10, "level-2").unwrap().name(), ANONYMOUS_NAME);
    }

    #[test]
    fn negative_score_is_rejected() {
        assert!(RankingDao::new("Ripley", &-1, "level-1").is_err());
        let mut ranking = RankingDao::new("Ripley", &0, "level-1").unwrap();
        assert!(ranking.set_score(&-5).is_err());
        assert_eq!(*ranking.score(), 0);
    }

    #[test]
    fn stats_average_is_floored() {
        let stats = RankingStats::new(&3, &10, &20);
        assert_eq!(*stats.average_score(), 6);
        assert_eq!(*RankingStats::new(&0, &0, &0).average_score(), 0);
    }

    #[tokio::test]
    async fn insert_then_select_round_trips_base_fields() {
        let (_dir, db) = sqlite_db(None).await;
        let ranking = add(&db, "Ripley", 1500).await;

        let loaded = RankingDao::db_select(&db, ranking.id()).await.unwrap();
        assert_eq!(loaded.id(), ranking.id());
        assert_eq!(loaded.created_at(), ranking.created_at());
        assert_eq!(loaded.updated_at(), ranking.updated_at());
        assert_eq!(loaded.created_at(), loaded.updated_at());
        assert_eq!(loaded.name(), "Ripley");
        assert_eq!(*loaded.score(), 1500);
        assert_eq!(loaded.level(), "level-1");
    }

    #[tokio::test]
    async fn insert_stamps_creation_time_at_persist() {
        let (_dir, db) = sqlite_db(None).await;
        let mut ranking = RankingDao::new("Ripley", &1, "level-1").unwrap();
        let constructed_at = *ranking.created_at();
        ranking.db_insert(&db).await.unwrap();
        assert!(*ranking.created_at() >= constructed_at);
        assert_eq!(ranking.created_at(), ranking.updated_at());
    }

    #[tokio::test]
    async fn update_keeps_creation_and_advances_update_time() {
        let (_dir, db) = sqlite_db(None).await;
        let mut ranking = add(&db, "Ripley", 100).await;
        let created_at = *ranking.created_at();

        let mut previous = *ranking.updated_at();
        for score in [200, 300, 400] {
            ranking.set_score(&score).unwrap();
            ranking.db_update(&db).await.unwrap();
            assert!(*ranking.updated_at() > previous);
            previous = *ranking.updated_at();
        }

        let loaded = RankingDao::db_select(&db, ranking.id()).await.unwrap();
        assert_eq!(*loaded.created_at(), created_at);
        assert_eq!(*loaded.updated_at(), previous);
        assert_eq!(*loaded.score(), 400);
    }

    #[tokio::test]
    async fn update_persists_level_and_name() {
        let (_dir, db) = sqlite_db(None).await;
        let mut ranking = add(&db, "Ripley", 100).await;
        ranking.set_level("level-5");
        ranking.set_name("  ");
        ranking.db_update(&db).await.unwrap();

        let loaded = RankingDao::db_select(&db, ranking.id()).await.unwrap();
        assert_eq!(loaded.level(), "level-5");
        assert_eq!(loaded.name(), ANONYMOUS_NAME);
    }

    #[tokio::test]
    async fn entry_below_a_full_ranking_is_trimmed_away() {
        let (_dir, db) = sqlite_db(Some(1)).await;
        add(&db, "Hicks", 500).await;

        let position = RankingDao::db_position(&db, &100).await.unwrap();
        assert_eq!(position, 2);
        assert!(!db.ranking_keeps_position(&position));

        let low = add(&db, "Ripley", 100).await;
        assert!(RankingDao::db_select(&db, low.id()).await.is_err());
        assert_eq!(RankingDao::db_count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn inserting_the_same_record_twice_fails_and_keeps_timestamps() {
        let (_dir, db) = sqlite_db(None).await;
        let mut ranking = add(&db, "Ripley", 100).await;
        let before = *ranking.base();
        assert!(ranking.db_insert(&db).await.is_err());
        assert_eq!(*ranking.base(), before);
    }

    #[tokio::test]
    async fn update_of_missing_entry_fails_without_advancing() {
        let (_dir, db) = sqlite_db(None).await;
        let mut ranking = RankingDao::new("Ripley", &100, "level-1").unwrap();
        let before = *ranking.updated_at();
        assert!(ranking.db_update(&db).await.is_err());
        assert_eq!(*ranking.updated_at(), before);
    }

    #[tokio::test]
    async fn ids_are_unique_across_entries() {
        let (_dir, db) = sqlite_db(None).await;
        let mut ids = HashSet::new();
        for score in 0..20 {
            let ranking = add(&db, "Ripley", score).await;
            assert!(ids.insert(*ranking.id()));
        }
        assert_eq!(RankingDao::db_count(&db).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn top_orders_by_score_then_age() {
        let (_dir, db) = sqlite_db(None).await;
        let first = add(&db, "Ripley", 300).await;
        add(&db, "Hicks", 500).await;
        let tied = add(&db, "Bishop", 300).await;
        add(&db, "Hudson", 100).await;

        let top = RankingDao::db_select_many_top(&db, &3).await.unwrap();
        let names: Vec<&str> = top.iter().map(|ranking| ranking.name()).collect();
        assert_eq!(names, ["Hicks", "Ripley", "Bishop"]);
        assert_eq!(top[1].id(), first.id());
        assert_eq!(top[2].id(), tied.id());
    }

    #[tokio::test]
    async fn insert_keeps_only_the_best_entries() {
        let (_dir, db) = sqlite_db(Some(3)).await;
        for (name, score) in [("A", 10), ("B", 40), ("C", 30), ("D", 20), ("E", 50)] {
            add(&db, name, score).await;
        }

        let top = RankingDao::db_select_many_top(&db, &10).await.unwrap();
        let scores: Vec<i64> = top.iter().map(|ranking| *ranking.score()).collect();
        assert_eq!(scores, [50, 40, 30]);
        assert_eq!(RankingDao::db_count(&db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn high_score_depends_on_free_slots_and_lowest_entry() {
        let (_dir, db) = sqlite_db(Some(2)).await;
        assert!(RankingDao::db_is_high_score(&db, &0).await.unwrap());

        add(&db, "Ripley", 100).await;
        assert!(RankingDao::db_is_high_score(&db, &1).await.unwrap());

        add(&db, "Hicks", 200).await;
        assert!(!RankingDao::db_is_high_score(&db, &100).await.unwrap());
        assert!(RankingDao::db_is_high_score(&db, &101).await.unwrap());
    }

    #[tokio::test]
    async fn unbounded_ranking_accepts_every_score() {
        let (_dir, db) = sqlite_db(None).await;
        add(&db, "Ripley", 100).await;
        assert!(RankingDao::db_is_high_score(&db, &0).await.unwrap());
    }

    #[tokio::test]
    async fn position_counts_entries_at_or_above() {
        let (_dir, db) = sqlite_db(None).await;
        assert_eq!(RankingDao::db_position(&db, &10).await.unwrap(), 1);

        add(&db, "Ripley", 300).await;
        add(&db, "Hicks", 200).await;
        add(&db, "Bishop", 100).await;

        assert_eq!(RankingDao::db_position(&db, &400).await.unwrap(), 1);
        assert_eq!(RankingDao::db_position(&db, &200).await.unwrap(), 3);
        assert_eq!(RankingDao::db_position(&db, &150).await.unwrap(), 3);
        assert_eq!(RankingDao::db_position(&db, &0).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn stats_summarise_the_ranking() {
        let (_dir, db) = sqlite_db(None).await;
        let empty = RankingDao::db_stats(&db).await.unwrap();
        assert_eq!(*empty.total_players(), 0);
        assert_eq!(*empty.highest_score(), 0);
        assert_eq!(*empty.average_score(), 0);

        add(&db, "Ripley", 100).await;
        add(&db, "Hicks", 250).await;
        add(&db, "Bishop", 5).await;

        let stats = RankingDao::db_stats(&db).await.unwrap();
        assert_eq!(*stats.total_players(), 3);
        assert_eq!(*stats.highest_score(), 250);
        assert_eq!(*stats.average_score(), 118);
    }

    #[tokio::test]
    async fn delete_removes_one_entry_and_reports_missing() {
        let (_dir, db) = sqlite_db(None).await;
        let ranking = add(&db, "Ripley", 100).await;
        add(&db, "Hicks", 200).await;

        RankingDao::db_delete(&db, ranking.id()).await.unwrap();
        assert!(RankingDao::db_select(&db, ranking.id()).await.is_err());
        assert!(RankingDao::db_delete(&db, ranking.id()).await.is_err());
        assert_eq!(RankingDao::db_count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_all_clears_the_ranking() {
        let (_dir, db) = sqlite_db(None).await;
        add(&db, "Ripley", 100).await;
        add(&db, "Hicks", 200).await;

        assert_eq!(RankingDao::db_delete_all(&db).await.unwrap(), 2);
        assert!(RankingDao::db_select_many_top(&db, &10)
            .await
            .unwrap()
            .is_empty());
    }
}
