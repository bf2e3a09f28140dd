//! Sync-related hooks for Dioxus components.
//!
//! Components read cards and connectivity from the global stores and send
//! intents through the handle; they never touch the connection itself.

use dioxus::prelude::*;

use super::connection::{Connectivity, SyncHandle};
use crate::stores::current_connectivity;

/// Hook to get the current connectivity (reactive).
pub fn use_connectivity() -> Connectivity {
    current_connectivity()
}

/// Hook to get the handle for sending intents.
///
/// Must be called below a `SyncManager`.
pub fn use_sync_handle() -> SyncHandle {
    use_context::<SyncHandle>()
}
