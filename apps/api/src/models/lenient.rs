//! Lenient field decoders for persisted and imported records.
//!
//! Records arrive from three places: the database, JSON bundles written by older
//! clients, and CSV cells. Any of them may carry `null`, an empty string, or a
//! numeric field typed as text. These decoders map every such value onto the
//! zero / blank sentinel instead of failing, so a bad cell never makes a whole
//! document unpaginatable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes an integer from a number, a numeric string, or nothing (→ 0).
pub fn int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_i64)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default())
}

/// Decodes a string, turning `null` into `""` and numbers/bools into their text.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// Decodes a free-text label into a label enum, treating `null` as blank.
pub fn label<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    string(deserializer).map(T::from)
}

/// Decodes a list of strings. Non-string items are stringified, anything that
/// is not a list (including a JSON-encoded list inside a string) is handled.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().map(value_to_string).collect(),
        Some(Value::String(s)) => serde_json::from_str::<Vec<Value>>(&s)
            .map(|items| items.into_iter().map(value_to_string).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    })
}

/// Decodes a calendar date from `YYYY-MM-DD` (or an RFC 3339 timestamp).
/// Blank or unparseable input yields `None`.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// Decodes an RFC 3339 timestamp; anything else yields `None`.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

/// Decodes a boolean that defaults to `true` when absent or malformed.
pub fn bool_default_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => !matches!(s.trim(), "false" | "0"),
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        _ => true,
    })
}

pub fn default_true() -> bool {
    true
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "int")]
        year: i32,
        #[serde(default, deserialize_with = "string")]
        content: String,
        #[serde(default, deserialize_with = "string_list")]
        duties: Vec<String>,
        #[serde(default, deserialize_with = "date")]
        born: Option<NaiveDate>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).expect("probe should always decode")
    }

    #[test]
    fn test_int_accepts_numeric_strings() {
        assert_eq!(probe(r#"{"year": "2021"}"#).year, 2021);
        assert_eq!(probe(r#"{"year": 2021.0}"#).year, 2021);
    }

    #[test]
    fn test_int_maps_garbage_to_zero() {
        assert_eq!(probe(r#"{"year": "abc"}"#).year, 0);
        assert_eq!(probe(r#"{"year": null}"#).year, 0);
        assert_eq!(probe(r#"{"year": ""}"#).year, 0);
        assert_eq!(probe(r#"{}"#).year, 0);
    }

    #[test]
    fn test_int_out_of_range_is_zero() {
        assert_eq!(probe(r#"{"year": 99999999999}"#).year, 0);
    }

    #[test]
    fn test_string_accepts_null_and_numbers() {
        assert_eq!(probe(r#"{"content": null}"#).content, "");
        assert_eq!(probe(r#"{"content": 42}"#).content, "42");
    }

    #[test]
    fn test_string_list_accepts_encoded_json() {
        let p = probe(r#"{"duties": "[\"a\",\"b\"]"}"#);
        assert_eq!(p.duties, vec!["a", "b"]);
        assert!(probe(r#"{"duties": "not json"}"#).duties.is_empty());
    }

    #[test]
    fn test_date_blank_is_none() {
        assert!(probe(r#"{"born": ""}"#).born.is_none());
        assert_eq!(
            probe(r#"{"born": "1990-04-02"}"#).born,
            NaiveDate::from_ymd_opt(1990, 4, 2)
        );
    }
}
