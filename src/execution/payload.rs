//! Structured payload extraction
//!
//! JSON-producing engine commands may surround their payload with log noise.
//! Decoding locates the first bracket- or brace-delimited region and parses
//! it; failure is an ordinary outcome, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

static EMBEDDED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\[[\s\S]*\]|\{[\s\S]*\})").expect("payload pattern is valid"));

/// Outcome of decoding engine output
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T = Value> {
    /// A payload was found and parsed
    Value(T),
    /// Text was present but held no parseable payload
    ParseFailed,
    /// The output was blank
    Empty,
}

impl<T> Decoded<T> {
    /// The decoded value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Decoded::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Consume into an `Option`
    pub fn ok(self) -> Option<T> {
        match self {
            Decoded::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a value was decoded
    pub fn is_value(&self) -> bool {
        matches!(self, Decoded::Value(_))
    }
}

impl Decoded<Value> {
    /// Array items of the payload; empty for anything that is not an array
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Decoded::Value(Value::Array(items)) => items,
            _ => Vec::new(),
        }
    }
}

/// Decode the JSON payload embedded in `text`
pub fn decode_payload(text: &str) -> Decoded {
    decode_payload_as(text)
}

/// Decode the payload embedded in `text` into `T`
pub fn decode_payload_as<T: DeserializeOwned>(text: &str) -> Decoded<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decoded::Empty;
    }

    if let Some(found) = EMBEDDED_JSON.find(trimmed) {
        if let Ok(value) = serde_json::from_str(found.as_str()) {
            return Decoded::Value(value);
        }
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Decoded::Value(value),
        Err(e) => {
            trace!("No structured payload: {}", e);
            Decoded::ParseFailed
        }
    }
}
