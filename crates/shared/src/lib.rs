//! Shared types for the device-state synchronization client: wire protocol,
//! attribute values and pairing artifacts.

pub mod error;
pub mod models;
pub mod protocol;

pub use error::*;
pub use models::*;
pub use protocol::*;
