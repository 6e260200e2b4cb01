use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use chirpy_db::models::{ChirpRow, UserRow};
use chirpy_types::api::{ChirpResponse, UserResponse};

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC and convert, trying RFC 3339 first.
pub(crate) fn parse_db_timestamp(value: &str) -> DateTime<Utc> {
    value
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", value, e);
            DateTime::default()
        })
}

pub(crate) fn parse_db_uuid(value: &str) -> Uuid {
    value.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}': {}", value, e);
        Uuid::default()
    })
}

pub(crate) fn user_response(row: UserRow) -> UserResponse {
    UserResponse {
        id: parse_db_uuid(&row.id),
        email: row.email,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}

pub(crate) fn chirp_response(row: ChirpRow) -> ChirpResponse {
    ChirpResponse {
        id: parse_db_uuid(&row.id),
        user_id: parse_db_uuid(&row.user_id),
        body: row.body,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_and_rfc3339_forms_agree() {
        assert_eq!(
            parse_db_timestamp("2026-08-07 12:30:00"),
            parse_db_timestamp("2026-08-07T12:30:00Z"),
        );
        assert_eq!(
            parse_db_timestamp("2026-08-07 12:30:00").to_rfc3339(),
            "2026-08-07T12:30:00+00:00",
        );
    }
}
