//! Device state and pairing models shared by the protocol and the client.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// The value of a single device attribute.
///
/// The gateway decides what values are legal; the client only cares about the
/// runtime type, which selects how the attribute is presented. Anything that is
/// not a boolean, number or string is kept verbatim and shown inertly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(Value),
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => AttributeValue::Number(f),
                None => AttributeValue::Other(Value::Number(n)),
            },
            Value::String(s) => AttributeValue::Text(s),
            other => AttributeValue::Other(other),
        }
    }
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Bool(b) => Value::Bool(b),
            // Integral values go out as integers so the gateway's int parsing accepts them.
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                Value::from(n as i64)
            }
            AttributeValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttributeValue::Text(s) => Value::String(s),
            AttributeValue::Other(v) => v,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => write!(f, "{}", s),
            AttributeValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Attribute name -> value for one device.
///
/// Ordered so that cards render their rows in a stable order.
pub type DeviceSnapshot = BTreeMap<String, AttributeValue>;

/// Third-party ecosystems the gateway can be paired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Matter,
    HomeKit,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 2] = [Ecosystem::Matter, Ecosystem::HomeKit];

    /// Path segment used by `GET /qr/<ecosystem>`.
    pub fn slug(&self) -> &'static str {
        match self {
            Ecosystem::Matter => "matter",
            Ecosystem::HomeKit => "homekit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Ecosystem::Matter => "Matter",
            Ecosystem::HomeKit => "HomeKit",
        }
    }
}

/// Pairing QR code and PIN returned by `GET /qr/<ecosystem>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingArtifact {
    /// Base64-encoded PNG.
    pub qr: String,
    pub pin: String,
}

impl PairingArtifact {
    /// Decoded PNG bytes. Fails if the gateway sent something that is not base64.
    pub fn image_bytes(&self) -> Result<Vec<u8>, ApiError> {
        BASE64
            .decode(self.qr.trim())
            .map_err(|e| ApiError::Deserialize(format!("qr is not base64: {e}")))
    }

    /// `data:` URI suitable for an `img` element.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.qr.trim())
    }
}
