//! Global stores for application state.
//!
//! The sync task owns the real state; these signals are read-only mirrors of
//! what it publishes, so components can subscribe reactively.

pub mod connection;
pub mod devices;

pub use connection::{current_connectivity, set_connectivity, CONNECTIVITY};
pub use devices::{set_cards, DEVICE_CARDS};
