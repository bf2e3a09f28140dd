//! Connectivity badge - a colored dot plus the connectivity label.

use dioxus::prelude::*;

use crate::ws::{use_connectivity, Connectivity};

#[component]
pub fn ConnectionBadge() -> Element {
    let connectivity = use_connectivity();

    let dot_class = match connectivity {
        Connectivity::Connected => "dot dot-ok",
        Connectivity::Disconnected => "dot dot-idle",
        Connectivity::Error => "dot dot-error",
    };
    let label = connectivity.label();

    rsx! {
        span { class: "badge", title: "Gateway {label}",
            span { class: "{dot_class}" }
            "{label}"
        }
    }
}
