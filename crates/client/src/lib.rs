//! devsync client - keeps a local view of smart-home devices in sync with a
//! gateway over WebSocket and presents it as a Dioxus desktop app.
//!
//! The sync core (`ws`, `state_store`, `projector`) has no UI dependency
//! beyond the `SyncManager` glue component and can be driven headless through
//! [`WsConnection`].

pub mod api_client;
pub mod config;
pub mod projector;
pub mod state_store;
pub mod stores;
pub mod ws;

pub mod components;
pub mod routes;
pub mod views;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use projector::{Control, DeviceCard, RangeBounds, ViewProjector, WidgetBinding};
pub use routes::Route;
pub use state_store::StateStore;
pub use ws::{Connectivity, SyncHandle, SyncManager, WsConnection};
