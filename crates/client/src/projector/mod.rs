//! Projection of the state store onto device cards and their controls.
//!
//! The projector holds the *visual* state: what each control currently shows.
//! It is rebuilt from the store on full renders, patched in place by
//! incremental updates, and moved ahead of the store by user input (a toggled
//! switch shows its new position before the gateway confirms it).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use devsync_shared::{AttributeValue, DeviceSnapshot, OutboundCommand};
use tracing::debug;

use crate::state_store::StateStore;

mod control;
mod debounce;

pub use control::{Control, RangeBounds, MODE_ATTRIBUTE, MODE_OPTIONS};
pub use debounce::{BindingKey, Debouncer};

/// Default quiet window for slider input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// One attribute rendered as a control.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetBinding {
    pub attribute: String,
    pub control: Control,
}

impl WidgetBinding {
    fn new(attribute: &str, value: &AttributeValue) -> Self {
        Self {
            attribute: attribute.to_string(),
            control: Control::for_value(attribute, value),
        }
    }
}

/// A device and the controls for each of its attributes, in attribute order.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
    pub device: String,
    pub bindings: Vec<WidgetBinding>,
    /// Bumped whenever the card's content changes.
    pub revision: u64,
}

impl DeviceCard {
    pub fn binding(&self, attribute: &str) -> Option<&WidgetBinding> {
        self.bindings.iter().find(|b| b.attribute == attribute)
    }

    fn binding_mut(&mut self, attribute: &str) -> Option<&mut WidgetBinding> {
        self.bindings.iter_mut().find(|b| b.attribute == attribute)
    }
}

fn bindings_for(snapshot: &DeviceSnapshot) -> Vec<WidgetBinding> {
    snapshot
        .iter()
        .map(|(attribute, value)| WidgetBinding::new(attribute, value))
        .collect()
}

pub struct ViewProjector {
    cards: BTreeMap<String, DeviceCard>,
    next_revision: u64,
    debouncer: Debouncer,
}

impl ViewProjector {
    pub fn new(debounce: Duration) -> Self {
        Self {
            cards: BTreeMap::new(),
            next_revision: 1,
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &DeviceCard> {
        self.cards.values()
    }

    pub fn card(&self, device: &str) -> Option<&DeviceCard> {
        self.cards.get(device)
    }

    pub fn control(&self, device: &str, attribute: &str) -> Option<&Control> {
        Some(&self.card(device)?.binding(attribute)?.control)
    }

    /// Rebuild every card from the store.
    ///
    /// Cards whose content is unchanged keep their revision, so rendering the
    /// same store twice is a no-op.
    pub fn render_all(&mut self, store: &StateStore) {
        self.cards.retain(|device, _| store.contains(device));
        for (device, snapshot) in store.devices() {
            self.install(device, bindings_for(snapshot));
        }
    }

    /// Rebuild one card. A device missing from the store loses its card.
    pub fn render_device(&mut self, device: &str, store: &StateStore) {
        match store.get(device) {
            Some(snapshot) => self.install(device, bindings_for(&snapshot)),
            None => {
                self.cards.remove(device);
            }
        }
    }

    /// Patch one binding in place.
    ///
    /// Returns `false` when the card or the binding does not exist; the caller
    /// falls back to a full render.
    pub fn update_attribute(
        &mut self,
        device: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> bool {
        let Some(card) = self.cards.get_mut(device) else {
            return false;
        };
        let Some(binding) = card.binding_mut(attribute) else {
            return false;
        };

        let before = binding.control.clone();
        if !binding.control.reflect(value) {
            binding.control = Control::for_value(attribute, value);
        }
        if binding.control != before {
            card.revision = self.next_revision;
            self.next_revision += 1;
        }
        true
    }

    /// Flip a toggle. The command carries the negation of what the control showed.
    pub fn toggle(&mut self, device: &str, attribute: &str) -> Option<OutboundCommand> {
        let next = match self.control(device, attribute)? {
            Control::Toggle { on } => !*on,
            other => {
                debug!(device, attribute, kind = other.kind(), "toggle on a non-toggle control");
                return None;
            }
        };
        self.show(device, attribute, &AttributeValue::Bool(next));
        Some(OutboundCommand::set(device, attribute, next))
    }

    /// Slider movement: shown immediately, sent after the quiet window.
    pub fn slide(&mut self, device: &str, attribute: &str, value: f64, now: Instant) {
        if !matches!(self.control(device, attribute), Some(Control::Range { .. })) {
            debug!(device, attribute, "slide on a non-range control");
            return;
        }
        self.show(device, attribute, &AttributeValue::Number(value));
        self.debouncer
            .schedule(BindingKey::new(device, attribute), value, now);
    }

    /// Numeric field commit. Sent immediately; supersedes a pending slider value.
    ///
    /// Input that does not parse to a finite number is ignored.
    pub fn commit_number(
        &mut self,
        device: &str,
        attribute: &str,
        raw: &str,
    ) -> Option<OutboundCommand> {
        let value = match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                debug!(device, attribute, raw, "ignoring non-numeric input");
                return None;
            }
        };
        if !matches!(self.control(device, attribute)?, Control::Range { .. }) {
            return None;
        }

        self.debouncer.cancel(&BindingKey::new(device, attribute));
        self.show(device, attribute, &AttributeValue::Number(value));
        Some(OutboundCommand::set(device, attribute, value))
    }

    /// Selector change. Choices outside the offered options are ignored.
    pub fn select(
        &mut self,
        device: &str,
        attribute: &str,
        choice: &str,
    ) -> Option<OutboundCommand> {
        match self.control(device, attribute)? {
            Control::Select { options, .. } if options.iter().any(|o| o == choice) => {}
            _ => {
                debug!(device, attribute, choice, "selection not offered");
                return None;
            }
        }
        self.show(device, attribute, &AttributeValue::Text(choice.to_string()));
        Some(OutboundCommand::set(device, attribute, choice))
    }

    /// Commands for every slider whose quiet window has elapsed.
    pub fn poll_debounced(&mut self, now: Instant) -> Vec<OutboundCommand> {
        self.debouncer
            .take_due(now)
            .into_iter()
            .map(|(key, value)| OutboundCommand::set(key.device, key.attribute, value))
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    fn install(&mut self, device: &str, bindings: Vec<WidgetBinding>) {
        if let Some(card) = self.cards.get(device) {
            if card.bindings == bindings {
                return;
            }
        }
        let revision = self.next_revision;
        self.next_revision += 1;
        self.cards.insert(
            device.to_string(),
            DeviceCard {
                device: device.to_string(),
                bindings,
                revision,
            },
        );
    }

    fn show(&mut self, device: &str, attribute: &str, value: &AttributeValue) {
        self.update_attribute(device, attribute, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(device: &str, attrs: &[(&str, AttributeValue)]) -> StateStore {
        let mut store = StateStore::new();
        for (attr, value) in attrs {
            store.merge_attribute(device, attr, value.clone());
        }
        store
    }

    fn projector() -> ViewProjector {
        ViewProjector::new(DEFAULT_DEBOUNCE)
    }

    #[test]
    fn snapshot_for_unknown_device_renders_one_toggle_on() {
        let store = store_with("LivingRoomLamp", &[("power", AttributeValue::Bool(true))]);
        let mut projector = projector();
        projector.render_all(&store);

        let card = projector.card("LivingRoomLamp").unwrap();
        assert_eq!(card.bindings.len(), 1);
        assert_eq!(card.bindings[0].control, Control::Toggle { on: true });
    }

    #[test]
    fn update_touches_only_the_matching_binding() {
        let mut store = store_with(
            "BedroomDimmer",
            &[
                ("brightness", AttributeValue::Number(10.0)),
                ("power", AttributeValue::Bool(true)),
            ],
        );
        store.merge_attribute("Kitchen", "power", AttributeValue::Bool(false));
        let mut projector = projector();
        projector.render_all(&store);
        let kitchen_before = projector.card("Kitchen").cloned();
        let power_before = projector.control("BedroomDimmer", "power").cloned();

        assert!(projector.update_attribute(
            "BedroomDimmer",
            "brightness",
            &AttributeValue::Number(42.0)
        ));

        assert_eq!(
            projector.control("BedroomDimmer", "brightness"),
            Some(&Control::Range {
                value: 42.0,
                bounds: RangeBounds::for_attribute("brightness"),
            })
        );
        assert_eq!(projector.control("BedroomDimmer", "power").cloned(), power_before);
        assert_eq!(projector.card("Kitchen").cloned(), kitchen_before);
    }

    #[test]
    fn update_without_binding_reports_miss() {
        let store = store_with("Lamp", &[("power", AttributeValue::Bool(true))]);
        let mut projector = projector();
        projector.render_all(&store);

        assert!(!projector.update_attribute("Lamp", "color", &AttributeValue::Text("red".into())));
        assert!(!projector.update_attribute("Ghost", "power", &AttributeValue::Bool(true)));
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let store = store_with(
            "Thermostat",
            &[
                ("mode", AttributeValue::Text("auto".into())),
                ("setpoint", AttributeValue::Number(21.0)),
            ],
        );
        let mut projector = projector();
        projector.render_all(&store);
        let first: Vec<DeviceCard> = projector.cards().cloned().collect();
        projector.render_all(&store);
        let second: Vec<DeviceCard> = projector.cards().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn render_all_drops_cards_for_forgotten_devices() {
        let mut store = store_with("Old", &[("power", AttributeValue::Bool(true))]);
        let mut projector = projector();
        projector.render_all(&store);

        store.replace_all(BTreeMap::new());
        projector.render_all(&store);
        assert!(projector.card("Old").is_none());
    }

    #[test]
    fn toggle_sends_negation_of_visual_state() {
        let store = store_with("Lamp", &[("power", AttributeValue::Bool(false))]);
        let mut projector = projector();
        projector.render_all(&store);

        assert_eq!(
            projector.toggle("Lamp", "power"),
            Some(OutboundCommand::set("Lamp", "power", true))
        );
        // Not yet confirmed by the gateway, but the switch already shows it.
        assert_eq!(
            projector.toggle("Lamp", "power"),
            Some(OutboundCommand::set("Lamp", "power", false))
        );
    }

    #[test]
    fn slider_burst_sends_last_value_once() {
        let store = store_with("BedroomDimmer", &[("brightness", AttributeValue::Number(0.0))]);
        let mut projector = projector();
        projector.render_all(&store);
        let t0 = Instant::now();

        for (i, value) in [10.0, 25.0, 60.0].into_iter().enumerate() {
            let at = t0 + Duration::from_millis(50 * i as u64);
            projector.slide("BedroomDimmer", "brightness", value, at);
            assert_eq!(
                projector.control("BedroomDimmer", "brightness"),
                Some(&Control::Range {
                    value,
                    bounds: RangeBounds::for_attribute("brightness"),
                })
            );
        }

        assert!(projector.poll_debounced(t0 + Duration::from_millis(200)).is_empty());
        assert_eq!(
            projector.poll_debounced(t0 + Duration::from_millis(400)),
            vec![OutboundCommand::set("BedroomDimmer", "brightness", 60.0)]
        );
        assert!(projector.poll_debounced(t0 + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn commit_cancels_pending_slide() {
        let store = store_with("Thermostat", &[("setpoint", AttributeValue::Number(20.0))]);
        let mut projector = projector();
        projector.render_all(&store);
        let t0 = Instant::now();

        projector.slide("Thermostat", "setpoint", 22.0, t0);
        assert_eq!(
            projector.commit_number("Thermostat", "setpoint", " 23 "),
            Some(OutboundCommand::set("Thermostat", "setpoint", 23.0))
        );
        assert_eq!(projector.next_deadline(), None);
        assert!(projector.poll_debounced(t0 + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn invalid_numeric_input_sends_nothing() {
        let store = store_with("Thermostat", &[("setpoint", AttributeValue::Number(20.0))]);
        let mut projector = projector();
        projector.render_all(&store);

        for raw in ["", "warm", "NaN", "inf"] {
            assert_eq!(projector.commit_number("Thermostat", "setpoint", raw), None);
        }
        assert_eq!(
            projector.control("Thermostat", "setpoint"),
            Some(&Control::Range {
                value: 20.0,
                bounds: RangeBounds::for_attribute("setpoint"),
            })
        );
    }

    #[test]
    fn mode_selector_sends_offered_choices_only() {
        let store = store_with("Thermostat", &[("mode", AttributeValue::Text("auto".into()))]);
        let mut projector = projector();
        projector.render_all(&store);

        assert_eq!(
            projector.select("Thermostat", "mode", "heat"),
            Some(OutboundCommand::set("Thermostat", "mode", "heat"))
        );
        assert_eq!(projector.select("Thermostat", "mode", "dry"), None);
    }

    #[test]
    fn other_values_are_inert() {
        let store = store_with(
            "Hub",
            &[("zones", AttributeValue::Other(serde_json::json!(["a", "b"])))],
        );
        let mut projector = projector();
        projector.render_all(&store);

        assert_eq!(projector.toggle("Hub", "zones"), None);
        assert_eq!(projector.commit_number("Hub", "zones", "1"), None);
        assert_eq!(projector.select("Hub", "zones", "a"), None);
    }
}
