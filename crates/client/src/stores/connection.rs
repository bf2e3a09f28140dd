//! Connectivity store.

use dioxus::prelude::*;

use crate::ws::Connectivity;

pub static CONNECTIVITY: GlobalSignal<Connectivity> = Signal::global(|| Connectivity::Disconnected);

pub fn set_connectivity(connectivity: Connectivity) {
    *CONNECTIVITY.write() = connectivity;
}

pub fn current_connectivity() -> Connectivity {
    *CONNECTIVITY.read()
}
