//! Calendar-date parsing shared by the validator and the wire format.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Parse a user or wire supplied date.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (the date part is kept).
/// Returns `None` for blank or unparseable input.
#[must_use]
pub fn parse_date(input: &str) -> Option<Date> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| OffsetDateTime::parse(trimmed, &Rfc3339).ok().map(OffsetDateTime::date))
}

/// Serde adapter for `Option<Date>` fields stored as `YYYY-MM-DD` strings.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// Serialize as a `YYYY-MM-DD` string or `null`.
    ///
    /// # Errors
    /// Propagates serializer failures.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_some(&date.to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from a date or timestamp string; blank strings and `null` become `None`.
    ///
    /// # Errors
    /// Returns an error when a non-blank string is not a date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        super::parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_plain_dates_and_timestamps() {
        assert_eq!(parse_date("2025-01-31"), Some(date!(2025 - 01 - 31)));
        assert_eq!(
            parse_date("2025-01-31T23:30:00+00:00"),
            Some(date!(2025 - 01 - 31))
        );
        assert_eq!(parse_date(" 2024-02-29 "), Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn rejects_blank_and_invalid_input() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(date!(2025 - 03 - 04).to_string(), "2025-03-04");
    }
}
