use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;

/// Exact decimal text of a numeric value.
///
/// The textual form is kept until encode time, so callers never commit a
/// high-precision literal to a lossy native type up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number(String);

impl Number {
    pub fn new(text: &str) -> Number {
        Number(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn to_json(&self) -> JsonValue {
        if let Ok(i) = self.0.parse::<i64>() {
            return JsonValue::Number(i.into());
        }
        if let Ok(u) = self.0.parse::<u64>() {
            return JsonValue::Number(u.into());
        }
        if let Ok(f) = self.0.parse::<f64>() {
            // only when the literal survives the float round-trip exactly
            if f.is_finite() && f.to_string() == self.0 {
                if let Some(n) = serde_json::Number::from_f64(f) {
                    return JsonValue::Number(n);
                }
            }
        }
        JsonValue::String(self.0.clone())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoding mode for [`DocValue::from_json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Return numeric JSON literals as their textual rendering instead of a
    /// native numeric value, so large or high-precision numbers survive the
    /// trip intact.
    pub numbers_as_strings: bool,
}

/// A native JSON document value.
///
/// Object keys are held in a `BTreeMap`, so rendering a value is
/// deterministic across runs.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    Duration(Duration),
    Array(Vec<DocValue>),
    Object(BTreeMap<String, DocValue>),
}

impl DocValue {
    /// Encodes the value for storage in a JSON column.
    ///
    /// Variants without a JSON counterpart are normalized: timestamps to
    /// RFC 3339 strings, byte blobs to base64 strings, durations to
    /// ISO-8601 duration strings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            DocValue::Null => JsonValue::Null,
            DocValue::Bool(b) => JsonValue::Bool(*b),
            DocValue::Number(n) => n.to_json(),
            DocValue::String(s) => JsonValue::String(s.clone()),
            DocValue::Timestamp(t) => {
                JsonValue::String(t.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            DocValue::Bytes(b) => JsonValue::String(BASE64.encode(b)),
            DocValue::Duration(d) => JsonValue::String(format_duration(*d)),
            DocValue::Array(items) => {
                JsonValue::Array(items.iter().map(DocValue::to_json).collect())
            }
            DocValue::Object(map) => {
                let obj: serde_json::Map<String, JsonValue> =
                    map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                JsonValue::Object(obj)
            }
        }
    }

    /// Decodes a retrieved JSON value back to a native value.
    pub fn from_json(json: &JsonValue, opts: DecodeOptions) -> DocValue {
        match json {
            JsonValue::Null => DocValue::Null,
            JsonValue::Bool(b) => DocValue::Bool(*b),
            JsonValue::Number(n) => {
                if opts.numbers_as_strings {
                    DocValue::String(n.to_string())
                } else {
                    DocValue::Number(Number(n.to_string()))
                }
            }
            JsonValue::String(s) => DocValue::String(s.clone()),
            JsonValue::Array(items) => DocValue::Array(
                items.iter().map(|v| DocValue::from_json(v, opts)).collect(),
            ),
            JsonValue::Object(obj) => DocValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), DocValue::from_json(v, opts)))
                    .collect(),
            ),
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, DocValue>> {
        match self {
            DocValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Member lookup on an object value.
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.as_object()?.get(key)
    }
}

impl fmt::Display for DocValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// ISO-8601 duration rendering, e.g. `PT5H21M0.01S`.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let nanos = d.subsec_nanos();
    let hours = secs / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;
    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        out.push_str(&format!("{seconds}.{}S", frac.trim_end_matches('0')));
    } else if seconds > 0 || out == "PT" {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn number_encodes_by_magnitude() {
        assert_eq!(Number::new("12").to_json(), serde_json::json!(12));
        assert_eq!(Number::new("-3").to_json(), serde_json::json!(-3));
        assert_eq!(
            Number::new("18446744073709551615").to_json(),
            serde_json::json!(u64::MAX),
        );
        assert_eq!(Number::new("45.23").to_json(), serde_json::json!(45.23));
        // wider than any native numeric type, kept as text
        let wide = "123456789012345678901234567890.5";
        assert_eq!(Number::new(wide).to_json(), serde_json::json!(wide));
    }

    #[test]
    fn timestamp_encodes_as_rfc3339() {
        let t = Utc.with_ymd_and_hms(1990, 2, 25, 19, 6, 39).unwrap();
        assert_eq!(
            DocValue::Timestamp(t).to_json(),
            serde_json::json!("1990-02-25T19:06:39Z"),
        );
    }

    #[test]
    fn bytes_encode_as_base64() {
        assert_eq!(
            DocValue::Bytes(vec![0, 1, 2, 3, 4]).to_json(),
            serde_json::json!("AAECAwQ="),
        );
    }

    #[test]
    fn duration_rendering() {
        let travel = Duration::from_secs(5 * 3600 + 21 * 60)
            + Duration::from_millis(10)
            + Duration::from_nanos(20);
        assert_eq!(format_duration(travel), "PT5H21M0.01000002S");
        assert_eq!(format_duration(Duration::ZERO), "PT0S");
        assert_eq!(format_duration(Duration::from_secs(90)), "PT1M30S");
        assert_eq!(format_duration(Duration::from_secs(3600)), "PT1H");
    }

    #[test]
    fn decode_numbers_as_strings() {
        let json = serde_json::json!({"age": 25, "salary": 45.23, "name": "Mary"});
        let opts = DecodeOptions { numbers_as_strings: true };
        let value = DocValue::from_json(&json, opts);
        assert_eq!(value.get("age"), Some(&DocValue::String("25".to_string())));
        assert_eq!(
            value.get("salary"),
            Some(&DocValue::String("45.23".to_string())),
        );
        assert_eq!(
            value.get("name"),
            Some(&DocValue::String("Mary".to_string())),
        );
    }

    #[test]
    fn decode_numbers_natively_by_default() {
        let json = serde_json::json!({"age": 25});
        let value = DocValue::from_json(&json, DecodeOptions::default());
        assert_eq!(value.get("age"), Some(&DocValue::Number(Number::new("25"))));
    }

    #[test]
    fn narrowing_is_fallible_not_fatal() {
        let arr = DocValue::Array(vec![DocValue::Bool(true)]);
        assert!(arr.as_array().is_some());
        assert!(arr.as_object().is_none());
        assert!(arr.as_str().is_none());
        let obj = DocValue::Object(BTreeMap::new());
        assert!(obj.as_object().is_some());
        assert!(obj.as_array().is_none());
    }

    #[test]
    fn display_is_deterministic_compact_json() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), DocValue::Number(Number::new("1")));
        map.insert("a".to_string(), DocValue::Bool(false));
        let value = DocValue::Object(map);
        assert_eq!(value.to_string(), r#"{"a":false,"b":1}"#);
        // repeated renderings are identical
        assert_eq!(value.to_string(), value.to_string());
    }

    #[test]
    fn round_trip_preserves_structure() {
        let json = serde_json::json!([{"k": [1, 2]}, null, true]);
        let value = DocValue::from_json(&json, DecodeOptions::default());
        assert_eq!(value.to_json(), json);
    }
}
