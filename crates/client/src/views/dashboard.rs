use dioxus::prelude::*;

use crate::components::ui::{Button, ButtonVariant};
use crate::components::DeviceCardView;
use crate::stores::DEVICE_CARDS;
use crate::ws::{use_connectivity, use_sync_handle, Connectivity};

/// Every known device as a card.
#[component]
pub fn Dashboard() -> Element {
    let handle = use_sync_handle();
    let connectivity = use_connectivity();
    let cards = DEVICE_CARDS.read().clone();

    rsx! {
        div { class: "toolbar",
            h1 { "Devices" }
            Button {
                variant: ButtonVariant::Secondary,
                onclick: move |_| handle.refresh(),
                "Refresh"
            }
        }
        if cards.is_empty() {
            div { class: "empty",
                if connectivity == Connectivity::Connected {
                    "The gateway reports no devices."
                } else {
                    "Waiting for the gateway…"
                }
            }
        }
        div { class: "card-grid",
            for card in cards {
                DeviceCardView { key: "{card.device}", card }
            }
        }
    }
}
