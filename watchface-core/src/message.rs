//! Decoding of the key-value weather messages sent by the phone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::model::WeatherUpdate;

/// Key names used in the inbound data map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageKeys {
    pub high: String,
    pub low: String,
    pub condition_code: String,
}

impl Default for MessageKeys {
    fn default() -> Self {
        Self {
            high: "high".to_string(),
            low: "low".to_string(),
            condition_code: "weatherId".to_string(),
        }
    }
}

/// How to treat keys missing from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Missing or `null` keys leave the displayed value as it is.
    #[default]
    Lenient,
    /// Every key must be present.
    Strict,
}

impl DecodeMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        }
    }
}

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("invalid weather update: missing field '{field}'")]
    InvalidUpdate { field: String },

    #[error("invalid weather update: field '{field}' has unusable value {value}")]
    Malformed { field: String, value: Value },

    #[error("weather update must be a key-value object, got {0}")]
    NotAnObject(Value),

    #[error("weather update is not valid UTF-8 text")]
    InvalidUtf8,

    #[error("weather update is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read weather updates: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode a data map into a [`WeatherUpdate`].
pub fn decode(
    message: &Map<String, Value>,
    keys: &MessageKeys,
    mode: DecodeMode,
) -> Result<WeatherUpdate, UpdateError> {
    let high = field(message, &keys.high, mode)?
        .map(|v| temperature(&keys.high, v))
        .transpose()?;
    let low = field(message, &keys.low, mode)?
        .map(|v| temperature(&keys.low, v))
        .transpose()?;
    let condition_code = field(message, &keys.condition_code, mode)?
        .map(|v| condition_code(&keys.condition_code, v))
        .transpose()?;

    Ok(WeatherUpdate { high, low, condition_code })
}

/// Decode one JSON text message.
pub fn decode_str(
    text: &str,
    keys: &MessageKeys,
    mode: DecodeMode,
) -> Result<WeatherUpdate, UpdateError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(map) => decode(&map, keys, mode),
        other => Err(UpdateError::NotAnObject(other)),
    }
}

fn field<'a>(
    message: &'a Map<String, Value>,
    key: &str,
    mode: DecodeMode,
) -> Result<Option<&'a Value>, UpdateError> {
    match (message.get(key), mode) {
        (Some(Value::Null) | None, DecodeMode::Strict) => {
            Err(UpdateError::InvalidUpdate { field: key.to_string() })
        }
        (Some(Value::Null) | None, DecodeMode::Lenient) => Ok(None),
        (Some(v), _) => Ok(Some(v)),
    }
}

fn malformed(field: &str, value: &Value) -> UpdateError {
    UpdateError::Malformed { field: field.to_string(), value: value.clone() }
}

/// Temperatures come either as numbers or as pre-formatted text like `"25°"`.
fn temperature(key: &str, value: &Value) -> Result<f64, UpdateError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_degrees(s),
        _ => None,
    };

    parsed.filter(|t| t.is_finite()).ok_or_else(|| malformed(key, value))
}

fn parse_degrees(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix(['C', 'F', 'c', 'f']).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('°').unwrap_or(trimmed);
    trimmed.trim().parse().ok()
}

fn condition_code(key: &str, value: &Value) -> Result<i32, UpdateError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|c| i32::try_from(c).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| malformed(key, value))
}

/// Transport delivering raw data maps in arrival order.
#[async_trait]
pub trait UpdateSource: Send {
    /// Next message, or `None` when the transport is closed.
    async fn next_message(&mut self) -> Result<Option<Map<String, Value>>, UpdateError>;
}

/// Reads one JSON object per line. Blank lines are skipped.
///
/// A line that is not UTF-8 or not a JSON object yields an error for that
/// line only; the next call continues with the following line.
#[derive(Debug)]
pub struct JsonLinesSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: Vec::new(), line_no: 0 }
    }

    /// Line number of the last line read (1-based).
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> UpdateSource for JsonLinesSource<R> {
    async fn next_message(&mut self) -> Result<Option<Map<String, Value>>, UpdateError> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = std::str::from_utf8(&self.buf).map_err(|_| UpdateError::InvalidUtf8)?;
            if line.trim().is_empty() {
                continue;
            }

            return match serde_json::from_str::<Value>(line)? {
                Value::Object(map) => Ok(Some(map)),
                other => Err(UpdateError::NotAnObject(other)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test value must be an object"),
        }
    }

    #[test]
    fn decodes_numeric_message_with_default_keys() {
        let msg = object(json!({ "high": 72, "low": 48.5, "weatherId": 601 }));
        let update = decode(&msg, &MessageKeys::default(), DecodeMode::Strict).unwrap();
        assert_eq!(update, WeatherUpdate::new(72.0, 48.5, 601));
    }

    #[test]
    fn decodes_preformatted_temperatures() {
        let msg = object(json!({ "high": "25°", "low": " -3°C ", "weatherId": "800" }));
        let update = decode(&msg, &MessageKeys::default(), DecodeMode::Lenient).unwrap();
        assert_eq!(update, WeatherUpdate::new(25.0, -3.0, 800));
    }

    #[test]
    fn lenient_mode_allows_partial_messages() {
        let msg = object(json!({ "low": 10, "weatherId": null }));
        let update = decode(&msg, &MessageKeys::default(), DecodeMode::Lenient).unwrap();
        assert_eq!(update, WeatherUpdate { low: Some(10.0), ..Default::default() });
    }

    #[test]
    fn strict_mode_names_missing_field() {
        let msg = object(json!({ "high": 72, "low": 48 }));
        let err = decode(&msg, &MessageKeys::default(), DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidUpdate { ref field } if field == "weatherId"));
        assert!(err.to_string().contains("missing field 'weatherId'"));
    }

    #[test]
    fn strict_mode_treats_null_as_missing() {
        let msg = object(json!({ "high": null, "low": 48, "weatherId": 800 }));
        let err = decode(&msg, &MessageKeys::default(), DecodeMode::Strict).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidUpdate { ref field } if field == "high"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let keys = MessageKeys::default();
        for msg in [
            json!({ "high": "warm" }),
            json!({ "high": true }),
            json!({ "high": "NaN" }),
            json!({ "weatherId": 800.5 }),
            json!({ "weatherId": 10_000_000_000_i64 }),
        ] {
            let err = decode(&object(msg), &keys, DecodeMode::Lenient).unwrap_err();
            assert!(matches!(err, UpdateError::Malformed { .. }), "{err}");
        }
    }

    #[test]
    fn custom_keys() {
        let keys = MessageKeys {
            high: "HIGH_TEMP_KEY".into(),
            low: "LOW_TEMP_KEY".into(),
            condition_code: "WEATHER_ID_KEY".into(),
        };
        let msg = object(json!({
            "HIGH_TEMP_KEY": "18°",
            "LOW_TEMP_KEY": "9°",
            "WEATHER_ID_KEY": 500,
        }));
        let update = decode(&msg, &keys, DecodeMode::Strict).unwrap();
        assert_eq!(update, WeatherUpdate::new(18.0, 9.0, 500));
    }

    #[test]
    fn decode_str_rejects_non_objects() {
        let keys = MessageKeys::default();
        assert!(matches!(
            decode_str("[1, 2]", &keys, DecodeMode::Lenient),
            Err(UpdateError::NotAnObject(_))
        ));
        assert!(matches!(decode_str("{", &keys, DecodeMode::Lenient), Err(UpdateError::Json(_))));
    }

    #[tokio::test]
    async fn json_lines_source_skips_blank_lines() {
        let input: &[u8] = b"{\"high\": 1}\n\n   \n{\"low\": 2}\n";
        let mut source = JsonLinesSource::new(input);

        let first = source.next_message().await.unwrap().unwrap();
        assert_eq!(first.get("high"), Some(&json!(1)));
        assert_eq!(source.line_no(), 1);

        let second = source.next_message().await.unwrap().unwrap();
        assert_eq!(second.get("low"), Some(&json!(2)));
        assert_eq!(source.line_no(), 4);

        assert!(source.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn json_lines_source_survives_invalid_utf8_line() {
        let input: &[u8] = b"{\"high\": 70}\n\xff\xfe\n{\"low\": 48}";
        let mut source = JsonLinesSource::new(input);

        assert!(source.next_message().await.unwrap().is_some());
        assert!(matches!(source.next_message().await, Err(UpdateError::InvalidUtf8)));
        assert_eq!(source.line_no(), 2);

        let last = source.next_message().await.unwrap().unwrap();
        assert_eq!(last.get("low"), Some(&json!(48)));
        assert!(source.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn json_lines_source_reports_bad_lines() {
        let input: &[u8] = b"42\n{\"high\": 1}\n";
        let mut source = JsonLinesSource::new(input);

        assert!(matches!(source.next_message().await, Err(UpdateError::NotAnObject(_))));
        assert!(source.next_message().await.unwrap().is_some());
    }
}
