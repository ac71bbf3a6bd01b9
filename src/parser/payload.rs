//! Base64 decoding of the request `content` field.

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;

use crate::error::{Result, RouteError};

/// Standard alphabet with padding, tolerating non-zero trailing bits in the
/// final symbol.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode the base64 `content` of a request into raw message bytes.
///
/// ASCII whitespace is ignored so that line-wrapped base64 is accepted.
/// An absent or falsy value (`null`, `""`, `0`, `false`, `[]`, `{}`) is
/// [`RouteError::MissingContent`]; any other non-string is
/// [`RouteError::NotText`].
pub fn decode_content(content: Option<&Value>) -> Result<Vec<u8>> {
    let content = match content {
        None => return Err(RouteError::MissingContent),
        Some(value) if is_falsy(value) => return Err(RouteError::MissingContent),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(RouteError::NotText {
                found: json_type_name(other),
            })
        }
    };

    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(LENIENT.decode(compact)?)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
