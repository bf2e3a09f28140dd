//! Inbound frame handling: parse, classify, update the store, reconcile cards.

use devsync_shared::{parse_frame, InboundMessage};
use tracing::{debug, warn};

use crate::projector::ViewProjector;
use crate::state_store::StateStore;

/// Counters kept for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub applied: u64,
    pub malformed: u64,
    pub ignored: u64,
    pub errors: u64,
}

/// What a frame did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    FullList,
    Snapshot,
    Update,
    GatewayError,
    Ignored,
    Malformed,
}

#[derive(Debug, Default)]
pub struct InboundDispatcher {
    stats: DispatchStats,
}

impl InboundDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Apply one text frame. A frame that fails to parse changes nothing.
    pub fn dispatch(
        &mut self,
        text: &str,
        store: &mut StateStore,
        projector: &mut ViewProjector,
    ) -> Dispatched {
        let message = match parse_frame(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, len = text.len(), "dropping malformed frame");
                self.stats.malformed += 1;
                return Dispatched::Malformed;
            }
        };

        match message {
            InboundMessage::FullList(devices) => {
                debug!(devices = devices.len(), "full device list");
                store.replace_all(devices);
                projector.render_all(store);
                self.stats.applied += 1;
                Dispatched::FullList
            }
            InboundMessage::Snapshot { device, state } => {
                debug!(%device, attributes = state.len(), "device snapshot");
                let known = projector.card(&device).is_some();
                store.replace_device(&device, state);
                if known {
                    projector.render_device(&device, store);
                } else {
                    projector.render_all(store);
                }
                self.stats.applied += 1;
                Dispatched::Snapshot
            }
            InboundMessage::Update {
                device,
                attribute,
                value,
            } => {
                debug!(%device, %attribute, %value, "attribute update");
                store.merge_attribute(&device, &attribute, value.clone());
                if !projector.update_attribute(&device, &attribute, &value) {
                    debug!(%device, %attribute, "no binding for update, re-rendering");
                    projector.render_all(store);
                }
                self.stats.applied += 1;
                Dispatched::Update
            }
            InboundMessage::Error { reason } => {
                warn!(%reason, "gateway reported an error");
                self.stats.errors += 1;
                Dispatched::GatewayError
            }
            InboundMessage::Ignored => {
                debug!("ignoring unrecognized frame");
                self.stats.ignored += 1;
                Dispatched::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::{Control, RangeBounds, DEFAULT_DEBOUNCE};
    use devsync_shared::AttributeValue;

    struct Fixture {
        dispatcher: InboundDispatcher,
        store: StateStore,
        projector: ViewProjector,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dispatcher: InboundDispatcher::new(),
                store: StateStore::new(),
                projector: ViewProjector::new(DEFAULT_DEBOUNCE),
            }
        }

        fn feed(&mut self, text: &str) -> Dispatched {
            self.dispatcher.dispatch(text, &mut self.store, &mut self.projector)
        }
    }

    #[test]
    fn malformed_frame_changes_nothing() {
        let mut fx = Fixture::new();
        fx.feed(r#"{"status":"ok","devices":{"Lamp":{"power":true}}}"#);
        let store_before = fx.store.clone();

        assert_eq!(fx.feed("{not json"), Dispatched::Malformed);
        assert_eq!(fx.store, store_before);
        assert_eq!(fx.dispatcher.stats().malformed, 1);
    }

    #[test]
    fn snapshot_for_unknown_device_renders_it() {
        let mut fx = Fixture::new();
        let outcome = fx.feed(r#"{"status":"ok","dev":"LivingRoomLamp","state":{"power":true}}"#);

        assert_eq!(outcome, Dispatched::Snapshot);
        assert_eq!(
            fx.store.attribute("LivingRoomLamp", "power"),
            Some(AttributeValue::Bool(true))
        );
        let card = fx.projector.card("LivingRoomLamp").unwrap();
        assert_eq!(card.bindings.len(), 1);
        assert_eq!(card.bindings[0].control, Control::Toggle { on: true });
    }

    #[test]
    fn update_patches_existing_slider_only() {
        let mut fx = Fixture::new();
        fx.feed(
            r#"{"status":"ok","devices":{
                "BedroomDimmer":{"brightness":10,"power":true},
                "Kitchen":{"power":false}}}"#,
        );
        let kitchen = fx.projector.card("Kitchen").cloned();

        let outcome =
            fx.feed(r#"{"event":"update","dev":"BedroomDimmer","attr":"brightness","val":42}"#);

        assert_eq!(outcome, Dispatched::Update);
        assert_eq!(
            fx.projector.control("BedroomDimmer", "brightness"),
            Some(&Control::Range {
                value: 42.0,
                bounds: RangeBounds::for_attribute("brightness"),
            })
        );
        assert_eq!(
            fx.projector.control("BedroomDimmer", "power"),
            Some(&Control::Toggle { on: true })
        );
        assert_eq!(fx.projector.card("Kitchen").cloned(), kitchen);
    }

    #[test]
    fn snapshot_for_known_device_replaces_only_that_card() {
        let mut fx = Fixture::new();
        fx.feed(r#"{"status":"ok","devices":{"Lamp":{"power":true},"Kitchen":{"power":false}}}"#);
        let kitchen = fx.projector.card("Kitchen").cloned();
        assert!(kitchen.is_some());

        let outcome = fx.feed(r#"{"status":"ok","dev":"Lamp","state":{"brightness":5}}"#);

        assert_eq!(outcome, Dispatched::Snapshot);
        let lamp = fx.projector.card("Lamp").unwrap();
        assert_eq!(lamp.bindings.len(), 1);
        assert_eq!(lamp.bindings[0].attribute, "brightness");
        assert_eq!(
            lamp.bindings[0].control,
            Control::Range {
                value: 5.0,
                bounds: RangeBounds::for_attribute("brightness"),
            }
        );
        assert!(lamp.binding("power").is_none());
        assert_eq!(fx.store.attribute("Lamp", "power"), None);
        assert_eq!(fx.projector.card("Kitchen").cloned(), kitchen);
    }

    #[test]
    fn update_for_new_attribute_falls_back_to_full_render() {
        let mut fx = Fixture::new();
        fx.feed(r#"{"status":"ok","devices":{"Lamp":{"power":true}}}"#);
        fx.feed(r#"{"event":"update","dev":"Lamp","attr":"color","val":"warm"}"#);
        fx.feed(r#"{"event":"update","dev":"Porch","attr":"power","val":false}"#);

        assert!(fx.projector.control("Lamp", "color").is_some());
        assert_eq!(
            fx.projector.control("Porch", "power"),
            Some(&Control::Toggle { on: false })
        );
    }

    #[test]
    fn identical_full_list_is_idempotent() {
        let frame = r#"{"status":"ok","devices":[
            {"id":"A","value":true},
            {"name":"B","state":{"power":false,"mode":"cool"}}]}"#;
        let mut fx = Fixture::new();
        fx.feed(frame);
        let store = fx.store.clone();
        let cards: Vec<_> = fx.projector.cards().cloned().collect();

        fx.feed(frame);
        assert_eq!(fx.store, store);
        assert_eq!(fx.projector.cards().cloned().collect::<Vec<_>>(), cards);
        assert_eq!(fx.store.attribute("A", "value"), Some(AttributeValue::Bool(true)));
        assert_eq!(fx.store.attribute("B", "power"), Some(AttributeValue::Bool(false)));
    }

    #[test]
    fn error_and_unknown_frames_are_counted_not_applied() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.feed(r#"{"status":"error","error":"unknown device"}"#),
            Dispatched::GatewayError
        );
        assert_eq!(fx.feed(r#"{"status":"ok"}"#), Dispatched::Ignored);
        assert!(fx.store.is_empty());

        let stats = fx.dispatcher.stats();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.applied, 0);
    }
}
