//! Gateway wire protocol: one JSON object per WebSocket text frame.
//!
//! Outbound frames are commands (`{"cmd": "list"}`, `{"cmd": "set", ...}`).
//! Inbound frames are not tagged consistently, so they are classified by shape
//! with [`classify`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;
use crate::models::{AttributeValue, DeviceSnapshot};

/// Keys tried, in order, to name a device in an array-shaped device list.
pub const DEVICE_KEY_FIELDS: [&str; 4] = ["id", "device_id", "name", "label"];

/// A command sent to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum OutboundCommand {
    /// Request a full resync of every device.
    List,
    /// Request the current snapshot of one device.
    Get {
        #[serde(rename = "dev")]
        device: String,
    },
    /// Request an attribute change.
    Set {
        #[serde(rename = "dev")]
        device: String,
        #[serde(rename = "attr")]
        attribute: String,
        #[serde(rename = "val")]
        value: AttributeValue,
    },
}

impl OutboundCommand {
    pub fn set(
        device: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        OutboundCommand::Set {
            device: device.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn get(device: impl Into<String>) -> Self {
        OutboundCommand::Get {
            device: device.into(),
        }
    }

    /// Serialize to a text frame.
    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Every known device; replaces the local cache.
    FullList(BTreeMap<String, DeviceSnapshot>),
    /// One device's complete attribute map.
    Snapshot { device: String, state: DeviceSnapshot },
    /// A single attribute changed.
    Update {
        device: String,
        attribute: String,
        value: AttributeValue,
    },
    /// The gateway rejected something we sent.
    Error { reason: String },
    /// A shape this client does not know about (including plain acks).
    Ignored,
}

/// Parse and classify a text frame.
pub fn parse_frame(text: &str) -> Result<InboundMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    Ok(classify(&value))
}

/// Classify a parsed frame by shape.
///
/// Precedence: full list, single-device snapshot, incremental update, error.
/// Everything else is [`InboundMessage::Ignored`].
pub fn classify(frame: &Value) -> InboundMessage {
    let Some(obj) = frame.as_object() else {
        return InboundMessage::Ignored;
    };

    let ok = obj.get("status").and_then(Value::as_str) == Some("ok");

    if ok {
        if let Some(devices) = obj.get("devices").and_then(normalize_devices) {
            return InboundMessage::FullList(devices);
        }

        if let (Some(device), Some(state)) = (
            obj.get("dev").and_then(Value::as_str),
            obj.get("state").and_then(Value::as_object),
        ) {
            return InboundMessage::Snapshot {
                device: device.to_string(),
                state: snapshot_from_object(state),
            };
        }
    }

    if obj.get("event").and_then(Value::as_str) == Some("update") {
        if let (Some(device), Some(attribute), Some(value)) = (
            obj.get("dev").and_then(Value::as_str),
            obj.get("attr").and_then(Value::as_str),
            obj.get("val"),
        ) {
            return InboundMessage::Update {
                device: device.to_string(),
                attribute: attribute.to_string(),
                value: AttributeValue::from(value.clone()),
            };
        }
    }

    if obj.get("status").and_then(Value::as_str) == Some("error") {
        let reason = obj
            .get("error")
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "unspecified".to_string());
        return InboundMessage::Error { reason };
    }

    InboundMessage::Ignored
}

/// Normalize a `devices` payload into device id -> attribute map.
///
/// Accepts either a mapping from device name to attribute map or an array of
/// per-device records. Returns `None` for any other shape.
pub fn normalize_devices(devices: &Value) -> Option<BTreeMap<String, DeviceSnapshot>> {
    match devices {
        Value::Object(map) => Some(
            map.iter()
                .map(|(name, state)| (name.clone(), snapshot_from_value(state)))
                .collect(),
        ),
        Value::Array(records) => Some(
            records
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|record| {
                    let key = record_key(record)?;
                    Some((key, record_state(record)))
                })
                .collect(),
        ),
        _ => None,
    }
}

/// First present of `id`, `device_id`, `name`, `label`.
fn record_key(record: &Map<String, Value>) -> Option<String> {
    DEVICE_KEY_FIELDS.iter().find_map(|field| match record.get(*field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Canonical attribute map for one array record.
fn record_state(record: &Map<String, Value>) -> DeviceSnapshot {
    match record.get("value") {
        Some(v) if !v.is_object() && !v.is_null() => {
            let mut state = DeviceSnapshot::new();
            state.insert("value".to_string(), AttributeValue::from(v.clone()));
            return state;
        }
        _ => {}
    }

    if let Some(state) = record.get("state").and_then(Value::as_object) {
        return snapshot_from_object(state);
    }

    snapshot_from_object(record)
}

fn snapshot_from_value(state: &Value) -> DeviceSnapshot {
    match state {
        Value::Object(map) => snapshot_from_object(map),
        other => {
            let mut snapshot = DeviceSnapshot::new();
            snapshot.insert("value".to_string(), AttributeValue::from(other.clone()));
            snapshot
        }
    }
}

fn snapshot_from_object(map: &Map<String, Value>) -> DeviceSnapshot {
    map.iter()
        .map(|(k, v)| (k.clone(), AttributeValue::from(v.clone())))
        .collect()
}
