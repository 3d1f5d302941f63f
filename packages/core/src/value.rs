//! Best-effort coercion of raw JSON values into typed field values.
//!
//! Every function here is total: a value that cannot be read as the
//! requested type yields `None` rather than an error. Callers decide whether
//! an absent value is acceptable.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// The semantic type of a model attribute, as declared in its field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string. Numbers and booleans are not stringified.
    String,
    /// A signed integer, from a JSON integer, an integral float, or a numeric string.
    Integer,
    /// A float, from a JSON number or a numeric string.
    Number,
    /// A boolean, from a JSON bool or the strings `"true"` / `"false"`.
    Bool,
    /// An ISO 8601 timestamp, normalised to UTC.
    Timestamp,
    /// An array of strings. Non-string items are skipped.
    StringList,
    /// A nested object. Its concrete type comes from the owning model's
    /// nested-type table; unregistered keys are kept as opaque JSON.
    Model,
    /// An array of nested objects, resolved the same way as [`FieldKind::Model`].
    ModelList,
    /// Any JSON value, kept as-is.
    Json,
}

impl FieldKind {
    /// Short description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Bool => "a boolean",
            FieldKind::Timestamp => "an ISO 8601 timestamp",
            FieldKind::StringList => "a list of strings",
            FieldKind::Model => "an object",
            FieldKind::ModelList => "a list of objects",
            FieldKind::Json => "a JSON value",
        }
    }
}

pub fn coerce_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// Read an integer. Floats are accepted only when they have no fractional part.
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp)
}

pub fn coerce_string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(coerce_string).collect())
}

/// Parse the timestamp forms the API is known to emit.
///
/// Accepted, in order: RFC 3339 (`2019-01-01T00:00:00Z`,
/// `2019-01-01T00:00:00+00:00`), a numeric offset without a colon
/// (`2019-01-01T00:00:00+0000`), a naive date-time taken as UTC, and a bare
/// date taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn integers_from_numbers_and_numeric_strings() {
        assert_eq!(coerce_i64(&json!(42)), Some(42));
        assert_eq!(coerce_i64(&json!("42")), Some(42));
        assert_eq!(coerce_i64(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_i64(&json!(3.0)), Some(3));
        assert_eq!(coerce_i64(&json!("3.0")), Some(3));
        assert_eq!(coerce_i64(&json!(3.5)), None);
        assert_eq!(coerce_i64(&json!("forty")), None);
        assert_eq!(coerce_i64(&json!(true)), None);
        assert_eq!(coerce_i64(&json!("9223372036854775807")), Some(i64::MAX));
        assert_eq!(coerce_i64(&json!("9223372036854775808")), None);
        assert_eq!(coerce_i64(&json!(9223372036854775808.0)), None);
        assert_eq!(coerce_i64(&json!(1e300)), None);
    }

    #[test]
    fn numbers_from_numbers_and_numeric_strings() {
        assert_eq!(coerce_f64(&json!(1.5)), Some(1.5));
        assert_eq!(coerce_f64(&json!("2.25")), Some(2.25));
        assert_eq!(coerce_f64(&json!("NaN")), None);
        assert_eq!(coerce_f64(&json!(null)), None);
    }

    #[test]
    fn strings_are_not_stringified() {
        assert_eq!(coerce_string(&json!("x")), Some("x".into()));
        assert_eq!(coerce_string(&json!(1)), None);
        assert_eq!(coerce_string(&json!(false)), None);
    }

    #[test]
    fn bools() {
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!("false")), Some(false));
        assert_eq!(coerce_bool(&json!("yes")), None);
    }

    #[test]
    fn string_list_skips_non_strings() {
        assert_eq!(
            coerce_string_list(&json!(["a", 1, "b", null])),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(coerce_string_list(&json!("a")), None);
    }

    #[test]
    fn timestamp_forms() {
        let utc = parse_timestamp("2019-01-01T00:00:00Z").unwrap();
        assert_eq!((utc.year(), utc.month(), utc.day()), (2019, 1, 1));

        let offset = parse_timestamp("2019-01-01T05:30:00+05:30").unwrap();
        assert_eq!(offset, utc);

        let no_colon = parse_timestamp("2019-01-01T00:00:00+0000").unwrap();
        assert_eq!(no_colon, utc);

        let naive = parse_timestamp("2019-01-01T12:15:00").unwrap();
        assert_eq!((naive.hour(), naive.minute()), (12, 15));

        let date = parse_timestamp("2019-01-01").unwrap();
        assert_eq!(date, utc);

        assert!(parse_timestamp("last tuesday").is_none());
        assert!(coerce_timestamp(&json!(1546300800)).is_none());
    }
}
