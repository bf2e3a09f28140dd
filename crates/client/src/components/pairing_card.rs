//! QR code and PIN for pairing the gateway with one ecosystem.

use devsync_shared::Ecosystem;
use dioxus::prelude::*;

use crate::api_client::ApiClient;
use crate::components::ui::{Button, ButtonVariant};

/// Fetches its artifact on mount. A failure shows the reason and a retry
/// button; it never touches the device connection.
#[component]
pub fn PairingCard(ecosystem: Ecosystem) -> Element {
    let client = use_context::<ApiClient>();

    let mut artifact = use_resource(move || {
        let client = client.clone();
        async move { client.fetch_pairing(ecosystem).await }
    });

    let label = ecosystem.label();

    rsx! {
        section { class: "card pairing-card",
            h2 { class: "card-title", "{label}" }
            match &*artifact.read() {
                None => rsx! {
                    p { class: "muted", "Loading {label} pairing code…" }
                },
                Some(Ok(pairing)) => rsx! {
                    img {
                        class: "qr",
                        src: "{pairing.data_uri()}",
                        alt: "{label} pairing QR code",
                    }
                    p { class: "pin",
                        "PIN "
                        code { "{pairing.pin}" }
                    }
                },
                Some(Err(e)) => rsx! {
                    p { class: "error", "{e.user_message()}" }
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| artifact.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}
