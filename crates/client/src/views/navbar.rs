use dioxus::prelude::*;

use crate::components::ConnectionBadge;
use crate::Route;

/// Top bar shared by every page.
#[component]
pub fn Navbar() -> Element {
    rsx! {
        nav { class: "navbar",
            span { class: "brand", "devsync" }
            Link { class: "nav-link", to: Route::Dashboard {}, "Devices" }
            Link { class: "nav-link", to: Route::Pairing {}, "Pairing" }
            div { class: "spacer" }
            ConnectionBadge {}
        }
        main { class: "content",
            Outlet::<Route> {}
        }
    }
}
