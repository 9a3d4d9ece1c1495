//! Deserializers that default instead of failing. Stat payloads are display-only,
//! so a `null`, missing or mistyped field reads as zero/empty.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads any JSON value as a number. Non-numbers and non-finite values become `0.0`.
///
/// # Errors
/// Only fails if the input is not valid JSON.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0))
}

/// Reads a string. `null` and non-strings become empty.
///
/// # Errors
/// Only fails if the input is not valid JSON.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

/// Reads a whole number that fits `T`. Anything else becomes `T::default()`.
///
/// # Errors
/// Only fails if the input is not valid JSON.
pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().and_then(|n| T::try_from(n).ok()).unwrap_or_default())
}

/// Reads a value of `T`, falling back to `T::default()` on `null` or a shape mismatch.
///
/// # Errors
/// Only fails if the input is not valid JSON.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Payload shape mismatch, using empty value");
        T::default()
    }))
}

/// The `{ "data": ... }` wrapper used by the stats endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "or_default")]
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Counter {
        #[serde(default, deserialize_with = "number")]
        value: f64,
    }

    #[derive(Debug, Default, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "integer")]
        index: u32,
    }

    #[test]
    fn test_number_defaults() {
        let cases = [r#"{"value": null}"#, r#"{"value": "12"}"#, r#"{"value": [1]}"#, "{}"];
        for case in cases {
            let counter: Counter = serde_json::from_str(case).unwrap();
            assert!(counter.value.abs() < f64::EPSILON, "case {case}");
        }

        let counter: Counter = serde_json::from_str(r#"{"value": 7.5}"#).unwrap();
        assert!((counter.value - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_and_integer_defaults() {
        let rows: Vec<Row> =
            serde_json::from_str(r#"[{"name": "a", "index": 3}, {"name": null, "index": -1}, {"name": 5, "index": "x"}, {}]"#)
                .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!((rows[0].name.as_str(), rows[0].index), ("a", 3));
        for row in &rows[1..] {
            assert!(row.name.is_empty());
            assert_eq!(row.index, 0);
        }
    }

    #[test]
    fn test_envelope_null_and_missing_data() {
        let env: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(env.data.is_empty());

        let env: Envelope<Vec<u32>> = serde_json::from_str("{}").unwrap();
        assert!(env.data.is_empty());

        let env: Envelope<Vec<u32>> = serde_json::from_str(r#"{"data": "oops"}"#).unwrap();
        assert!(env.data.is_empty());
    }
}
