use serde::Deserialize;

#[derive(Deserialize, Default)]
pub struct RankingConfig {
    max_entries: Option<u32>,
}

impl RankingConfig {
    /// Number of entries the ranking keeps; `None` keeps every entry.
    pub fn max_entries(&self) -> &Option<u32> {
        &self.max_entries
    }
}
