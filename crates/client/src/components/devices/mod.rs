//! Device card and per-attribute controls.

pub mod controls;
pub mod device_card;

pub use controls::ControlRow;
pub use device_card::DeviceCardView;
