use devsync_shared::Ecosystem;
use dioxus::prelude::*;

use crate::components::PairingCard;

#[component]
pub fn Pairing() -> Element {
    rsx! {
        h1 { "Pair with a smart-home ecosystem" }
        p { class: "muted", "Scan a code with the ecosystem's app, or enter the PIN." }
        div { class: "card-grid",
            for ecosystem in Ecosystem::ALL {
                PairingCard { key: "{ecosystem.slug()}", ecosystem }
            }
        }
    }
}
