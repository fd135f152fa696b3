//! Serde helpers for query-string and form deserialization.
//!
//! Report windows are chosen from loose user input, so these helpers read
//! anything unusable as `None` instead of failing the whole extraction.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.as_deref().and_then(parse_iso_date))
}

/// `YYYY-MM-DD`, surrounding whitespace ignored.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Integer coercion in the style of a browser's `parseInt`: optional
/// leading whitespace and sign, then as many digits as are present.
/// `"7"`, `" 7 "` and `"7abc"` give 7; `"abc"`, `""` and `"-"` give `None`.
pub fn parse_leading_int(input: &str) -> Option<i32> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("7"), Some(7));
        assert_eq!(parse_leading_int(" 12 "), Some(12));
        assert_eq!(parse_leading_int("3abc"), Some(3));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int("-2"), Some(-2));
        assert_eq!(parse_leading_int("+5"), Some(5));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date(" 2024-02-29 "),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_iso_date("2023-02-29"), None);
        assert_eq!(parse_iso_date("03/01/2024"), None);
        assert_eq!(parse_iso_date("2024-01-01,2024-01-02"), None);
    }
}
