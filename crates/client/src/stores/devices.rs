//! Device card store.

use dioxus::prelude::*;

use crate::projector::DeviceCard;

/// Cards as last published by the sync task, in device order.
pub static DEVICE_CARDS: GlobalSignal<Vec<DeviceCard>> = Signal::global(Vec::new);

/// Replace the mirrored cards.
pub fn set_cards(cards: Vec<DeviceCard>) {
    *DEVICE_CARDS.write() = cards;
}
