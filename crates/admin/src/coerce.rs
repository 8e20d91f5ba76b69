//! Lenient number coercion for loosely typed server and spreadsheet data.
//!
//! Rules: surrounding whitespace is ignored, an empty string is zero,
//! booleans are 1/0, `null` is zero, and anything that does not parse to a
//! finite number is rejected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a string the way a lenient numeric conversion would.
#[must_use]
pub fn number_from_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    // `f64::from_str` accepts "inf" and "NaN"; only finite values count
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerce a JSON value to a number.
#[must_use]
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => number_from_str(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize an amount, treating missing, null or malformed values as zero.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value).unwrap_or(0.0))
}

/// Deserialize a whole-number count, treating malformed values as zero.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .map_or(0, truncate))
}

/// Deserialize an optional count; absent or malformed values stay `None`.
pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => number_from_value(&v).map(truncate),
    })
}

/// Deserialize free text that the server sometimes sends as a number.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation)] // counts are far below i64::MAX
fn truncate(n: f64) -> i64 {
    n as i64
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_number_from_str() {
        assert_eq!(number_from_str("3"), Some(3.0));
        assert_eq!(number_from_str(" 2.5 "), Some(2.5));
        assert_eq!(number_from_str(""), Some(0.0));
        assert_eq!(number_from_str("   "), Some(0.0));
        assert_eq!(number_from_str("x"), None);
        assert_eq!(number_from_str("12abc"), None);
        assert_eq!(number_from_str("inf"), None);
        assert_eq!(number_from_str("NaN"), None);
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(7)), Some(7.0));
        assert_eq!(number_from_value(&json!("7")), Some(7.0));
        assert_eq!(number_from_value(&json!(true)), Some(1.0));
        assert_eq!(number_from_value(&Value::Null), Some(0.0));
        assert_eq!(number_from_value(&json!([1])), None);
    }

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_amount")]
        amount: f64,
        #[serde(default, deserialize_with = "lenient_count")]
        count: i64,
        #[serde(default, deserialize_with = "optional_count")]
        stock: Option<i64>,
        #[serde(default, deserialize_with = "optional_text")]
        label: Option<String>,
    }

    #[test]
    fn test_lenient_deserializers() {
        let sample: Sample = serde_json::from_value(json!({
            "amount": "12.5",
            "count": 3.0,
            "stock": null,
            "label": 1042
        }))
        .expect("deserialize");
        assert!((sample.amount - 12.5).abs() < f64::EPSILON);
        assert_eq!(sample.count, 3);
        assert_eq!(sample.stock, None);
        assert_eq!(sample.label.as_deref(), Some("1042"));

        let empty: Sample = serde_json::from_value(json!({})).expect("deserialize");
        assert!(empty.amount.abs() < f64::EPSILON);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.stock, None);
        assert_eq!(empty.label, None);

        let malformed: Sample =
            serde_json::from_value(json!({"amount": "n/a", "stock": "12"})).expect("deserialize");
        assert!(malformed.amount.abs() < f64::EPSILON);
        assert_eq!(malformed.stock, Some(12));
    }
}
