use anyhow::{Error, Result};
use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Fractional digits kept on stored timestamps. MySQL `datetime(6)` and
/// PostgreSQL `timestamptz` both stop at microseconds.
const TIMESTAMP_PRECISION: u16 = 6;

pub fn str_to_uuid(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|err| Error::msg(format!("Invalid record id '{id}': {err}")))
}

pub fn uuid_to_string(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

pub fn truncate_timestamp(timestamp: &DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(TIMESTAMP_PRECISION)
}

pub fn now() -> DateTime<Utc> {
    truncate_timestamp(&Utc::now())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    #[test]
    fn uuid_string_is_hyphenated_and_parses_back() {
        let id = Uuid::new_v4();
        let text = uuid_to_string(&id);
        assert_eq!(text.len(), 36);
        assert_eq!(str_to_uuid(&text).unwrap(), id);
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = str_to_uuid("not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("not-a-uuid"));
    }

    #[test]
    fn truncation_drops_sub_microsecond_digits() {
        let timestamp = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        assert_eq!(truncate_timestamp(&timestamp).nanosecond(), 123_456_000);
    }

    #[test]
    fn now_has_microsecond_precision() {
        assert_eq!(now().nanosecond() % 1_000, 0);
    }
}
