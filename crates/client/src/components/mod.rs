//! Reusable components.

pub mod connection_badge;
pub mod devices;
pub mod pairing_card;
pub mod ui;

pub use connection_badge::ConnectionBadge;
pub use devices::{ControlRow, DeviceCardView};
pub use pairing_card::PairingCard;
