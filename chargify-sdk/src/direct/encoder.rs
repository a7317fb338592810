//! Canonical query-string encoding of `secure[data]`.
//!
//! The encoding follows the nested query-string convention used by the
//! remote service:
//! - nested mappings become `key[sub][subsub]=value`
//! - sequences use numeric indices, `key[0]=a&key[1]=b`
//! - keys and values are form-urlencoded (space as `+`, RFC 1738 reserved
//!   characters percent-escaped) and then `%5B`/`%5D` are turned back into
//!   literal `[`/`]`
//!
//! The output is the exact byte input of the request signature, so it must be
//! deterministic: insertion order is kept and keys are never sorted.

use serde_json::{Map, Value};

use crate::error::{ChargifyError, ChargifyResult};

/// Separator placed between `key=value` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// Plain `&`, used for signing and POST bodies
    Ampersand,
    /// `&amp;`, for embedding in an HTML attribute value
    HtmlEntity,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Ampersand => "&",
            Separator::HtmlEntity => "&amp;",
        }
    }
}

/// Encode a mapping into its canonical query-string form.
///
/// `null` values are skipped, booleans become `1`/`0`, empty mappings and
/// sequences produce no pairs.
///
/// # Example
///
/// ```ignore
/// let data = json!({"a": {"b": "1"}});
/// assert_eq!(encode(data.as_object().unwrap(), Separator::Ampersand), "a[b]=1");
/// ```
pub fn encode(data: &Map<String, Value>, separator: Separator) -> String {
    let mut pairs = Vec::new();
    for (key, value) in data {
        flatten(urlencode(key), value, &mut pairs);
    }

    pairs
        .join(separator.as_str())
        .replace("%5B", "[")
        .replace("%5D", "]")
}

/// Encode an arbitrary JSON value, which must be a mapping.
///
/// # Errors
///
/// Returns an encoding error for scalars and sequences at the top level,
/// since they have no key to hang the pairs on.
pub fn encode_value(data: &Value, separator: Separator) -> ChargifyResult<String> {
    match data {
        Value::Object(map) => Ok(encode(map, separator)),
        other => Err(ChargifyError::Encoding(format!(
            "secure data must be a mapping, got {}",
            value_kind(other)
        ))),
    }
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push(format!("{}={}", prefix, if *flag { "1" } else { "0" })),
        Value::Number(number) => pairs.push(format!("{}={}", prefix, urlencode(&number.to_string()))),
        Value::String(text) => pairs.push(format!("{}={}", prefix, urlencode(text))),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{}%5B{}%5D", prefix, index), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten(format!("{}%5B{}%5D", prefix, urlencode(key)), item, pairs);
            }
        }
    }
}

/// Form-urlencode a key or value.
///
/// `urlencoding` leaves `~` alone and writes spaces as `%20`; the remote
/// service signs with `~` escaped and spaces as `+`.
fn urlencode(raw: &str) -> String {
    urlencoding::encode(raw)
        .replace("%20", "+")
        .replace('~', "%7E")
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
