//! Payload assembly: `<record>,<record>,...|<minutesSinceEpoch>`.
//!
//! The item segment may be empty (`|29213856` is an empty cart). The split
//! happens on the LAST pipe; records are refused at encode time if they
//! contain a pipe, so the last pipe is always the timestamp separator.

use chrono::{DateTime, Utc};

use crate::error::{TokenError, TokenResult};

pub const ITEM_SEPARATOR: char = ',';
pub const TIMESTAMP_SEPARATOR: char = '|';

/// A payload split back into its parts. Records borrow from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<'a> {
    pub records: Vec<&'a str>,
    pub minutes: i64,
}

/// Whole minutes since the Unix epoch, rounded toward negative infinity.
pub fn minutes_since_epoch(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(60)
}

/// Joins records and appends the mint time.
pub fn build_payload<S: AsRef<str>>(records: &[S], minutes: i64) -> String {
    let items = records
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&ITEM_SEPARATOR.to_string());
    format!("{items}{TIMESTAMP_SEPARATOR}{minutes}")
}

/// Splits a decompressed payload.
///
/// ## Errors
/// `MalformedPayload` when there is no pipe or the trailer is not an integer.
pub fn parse_payload(payload: &str) -> TokenResult<Payload<'_>> {
    let (items, minutes) = payload
        .rsplit_once(TIMESTAMP_SEPARATOR)
        .ok_or_else(|| TokenError::MalformedPayload("missing timestamp separator".to_string()))?;

    let minutes = minutes
        .parse::<i64>()
        .map_err(|_| TokenError::MalformedPayload(format!("invalid timestamp '{minutes}'")))?;

    let records = if items.is_empty() {
        Vec::new()
    } else {
        items.split(ITEM_SEPARATOR).collect()
    };

    Ok(Payload { records, minutes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_and_parse() {
        let payload = build_payload(&["S00111:2", "Gorra_default_default:1"], 29213856);
        assert_eq!(payload, "S00111:2,Gorra_default_default:1|29213856");

        let parsed = parse_payload(&payload).unwrap();
        assert_eq!(parsed.records, ["S00111:2", "Gorra_default_default:1"]);
        assert_eq!(parsed.minutes, 29213856);
    }

    #[test]
    fn test_empty_cart_payload() {
        let payload = build_payload::<&str>(&[], 42);
        assert_eq!(payload, "|42");
        let parsed = parse_payload(&payload).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.minutes, 42);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            parse_payload("S00111:2"),
            Err(TokenError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload("S00111:2|soon"),
            Err(TokenError::MalformedPayload(_))
        ));
        assert!(matches!(parse_payload("S00111:2|"), Err(TokenError::MalformedPayload(_))));
    }

    #[test]
    fn test_minutes_since_epoch() {
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 2, 59).unwrap();
        assert_eq!(minutes_since_epoch(t), 2);
        let before = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 30).unwrap();
        assert_eq!(minutes_since_epoch(before), -1);
    }
}
