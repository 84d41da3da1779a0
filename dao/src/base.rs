use anyhow::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::util::conversion;

/// Identity and timestamps shared by every persisted record.
///
/// `BaseDao` never maps to a table of its own; concrete records embed one and
/// expose it through [`BaseModel`]. The id is a random (v4) UUID assigned on
/// construction. `created_at` is fixed when the record is first inserted and
/// `updated_at` moves forward on every write, so `created_at <= updated_at`
/// always holds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BaseDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BaseDao {
    pub fn new() -> Self {
        let now = conversion::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_parts(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        updated_at: &DateTime<Utc>,
    ) -> Result<Self> {
        if created_at > updated_at {
            return Err(Error::msg(format!(
                "Record '{id}' was updated ({updated_at}) before it was created ({created_at})"
            )));
        }
        Ok(Self {
            id: *id,
            created_at: *created_at,
            updated_at: *updated_at,
        })
    }

    pub(crate) fn from_stored(
        id: &str,
        created_at: &DateTime<Utc>,
        updated_at: &DateTime<Utc>,
    ) -> Result<Self> {
        Self::from_parts(&conversion::str_to_uuid(id)?, created_at, updated_at)
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    /// Copy carrying the timestamps of a first insert.
    pub fn stamped_for_insert(&self) -> Self {
        let now = conversion::now();
        Self {
            id: self.id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy whose `updated_at` is strictly later than this one's.
    ///
    /// Falls back to one microsecond past the previous value when the clock
    /// has not moved on, or has stepped backwards.
    pub fn stamped_for_update(&self) -> Self {
        let next = self.updated_at + Duration::microseconds(1);
        let now = conversion::now();
        Self {
            id: self.id,
            created_at: self.created_at,
            updated_at: if now >= next { now } else { next },
        }
    }

    pub(crate) fn id_string(&self) -> String {
        conversion::uuid_to_string(&self.id)
    }
}

impl Default for BaseDao {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BaseModel {
    fn base(&self) -> &BaseDao;

    fn id(&self) -> &Uuid {
        self.base().id()
    }

    fn created_at(&self) -> &DateTime<Utc> {
        self.base().created_at()
    }

    fn updated_at(&self) -> &DateTime<Utc> {
        self.base().updated_at()
    }
}
