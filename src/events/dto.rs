use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use crate::error::ApiError;
use crate::validate::require_len;

time::serde::format_description!(
    event_date,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

/// Event as returned to clients. Members are user ids (the shape they are
/// submitted in); tags are interest titles.
#[derive(Debug, Serialize)]
pub struct EventDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(with = "event_date")]
    pub date: PrimitiveDateTime,
    pub members: Vec<i32>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventAddRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub members: Vec<i32>,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct EventEditRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub members: Vec<i32>,
    pub date: String,
}

pub fn validate_event_fields(title: &str, description: &str) -> Result<(), ApiError> {
    require_len("title", title, 50)?;
    require_len("description", description, 200)
}

/// Parse a submitted event date. Offset forms (RFC 3339, `Z` included) are
/// normalized to UTC and the offset dropped; a bare
/// `YYYY-MM-DDTHH:MM:SS[.f]` is taken as already UTC.
pub fn parse_event_date(raw: &str) -> Result<PrimitiveDateTime, ApiError> {
    if let Ok(odt) = OffsetDateTime::parse(raw, &Rfc3339) {
        let utc = odt.to_offset(UtcOffset::UTC);
        return Ok(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    let naive = format_description!(
        version = 2,
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(raw, naive).map_err(|_| ApiError::validation("Data is invalid!"))
}

/// Inclusive filter bound from a Unix timestamp, interpreted as UTC to match
/// the stored naive-UTC dates.
pub fn timestamp_bound(ts: i64) -> Result<PrimitiveDateTime, ApiError> {
    let odt = OffsetDateTime::from_unix_timestamp(ts)
        .map_err(|_| ApiError::validation("Data is invalid!"))?;
    Ok(PrimitiveDateTime::new(odt.date(), odt.time()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn z_suffix_and_offset_normalize_to_the_same_instant() {
        let from_z = parse_event_date("2025-06-01T12:00:00Z").unwrap();
        let from_offset = parse_event_date("2025-06-01T15:00:00+03:00").unwrap();
        assert_eq!(from_z, datetime!(2025-06-01 12:00:00));
        assert_eq!(from_z, from_offset);
    }

    #[test]
    fn naive_input_is_taken_as_utc() {
        let parsed = parse_event_date("2025-06-01T12:30:45").unwrap();
        assert_eq!(parsed, datetime!(2025-06-01 12:30:45));
    }

    #[test]
    fn subseconds_are_accepted() {
        let parsed = parse_event_date("2025-06-01T12:30:45.5").unwrap();
        assert_eq!(parsed.date(), datetime!(2025-06-01 12:30:45).date());
    }

    #[test]
    fn garbage_date_is_a_validation_error() {
        let err = parse_event_date("next tuesday").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn timestamp_bound_is_utc() {
        // 2025-06-01T12:00:00Z
        let bound = timestamp_bound(1748779200).unwrap();
        assert_eq!(bound, datetime!(2025-06-01 12:00:00));
    }

    #[test]
    fn event_dto_date_serializes_naive() {
        let dto = EventDto {
            id: 1,
            title: "Hackathon".into(),
            description: "weekend build".into(),
            date: datetime!(2025-06-01 12:00:00),
            members: vec![1, 2],
            tags: vec!["Rust".into()],
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["date"], "2025-06-01T12:00:00");
    }
}
