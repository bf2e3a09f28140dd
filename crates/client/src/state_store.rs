//! Canonical local cache of device state.

use std::collections::BTreeMap;

use devsync_shared::{AttributeValue, DeviceSnapshot};

/// Device id -> attribute map, as last reported by the gateway.
///
/// Only the inbound dispatcher mutates it. Readers get copies or shared
/// borrows, never a handle they could write through.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StateStore {
    devices: BTreeMap<String, DeviceSnapshot>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full resync: everything not in `devices` is forgotten.
    pub fn replace_all(&mut self, devices: BTreeMap<String, DeviceSnapshot>) {
        self.devices = devices;
    }

    pub fn replace_device(&mut self, device: &str, snapshot: DeviceSnapshot) {
        self.devices.insert(device.to_string(), snapshot);
    }

    /// Set one attribute, creating the device entry if needed.
    pub fn merge_attribute(&mut self, device: &str, attribute: &str, value: AttributeValue) {
        self.devices
            .entry(device.to_string())
            .or_default()
            .insert(attribute.to_string(), value);
    }

    pub fn get(&self, device: &str) -> Option<DeviceSnapshot> {
        self.devices.get(device).cloned()
    }

    pub fn attribute(&self, device: &str, attribute: &str) -> Option<AttributeValue> {
        self.devices.get(device)?.get(attribute).cloned()
    }

    pub fn contains(&self, device: &str) -> bool {
        self.devices.contains_key(device)
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    pub fn devices(&self) -> impl Iterator<Item = (&str, &DeviceSnapshot)> {
        self.devices.iter().map(|(id, snapshot)| (id.as_str(), snapshot))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
