use dioxus::prelude::*;

use super::ControlRow;
use crate::components::ui::{Button, ButtonVariant};
use crate::projector::DeviceCard;
use crate::ws::use_sync_handle;

/// One device: a header and a row per attribute.
#[component]
pub fn DeviceCardView(card: DeviceCard) -> Element {
    let handle = use_sync_handle();
    let device = card.device.clone();

    rsx! {
        section { class: "card", "data-device": "{card.device}",
            header { class: "card-header",
                h2 { class: "card-title", "{card.device}" }
                Button {
                    variant: ButtonVariant::Ghost,
                    title: "Reload this device".to_string(),
                    onclick: move |_| handle.request_device(&device),
                    "↻"
                }
            }
            if card.bindings.is_empty() {
                p { class: "muted", "No attributes reported" }
            }
            for binding in card.bindings.iter() {
                ControlRow {
                    key: "{binding.attribute}",
                    device: card.device.clone(),
                    binding: binding.clone(),
                }
            }
        }
    }
}
