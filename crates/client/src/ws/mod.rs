//! Real-time synchronization with the device gateway.
//!
//! # Architecture
//!
//! ```text
//!   UI components ──intents──▶ SyncHandle
//!                                  │
//!                                  ▼
//!   ┌──────────────────────── driver task ───────────────────────┐
//!   │ SyncEngine                                                 │
//!   │   ConnectionManager ── OutboundQueue ──▶ writer task ──▶ ws │
//!   │   InboundDispatcher ◀── frames ◀────────────────────── ws  │
//!   │        │                                                   │
//!   │        ▼                                                   │
//!   │   StateStore ──▶ ViewProjector (cards, debounce)           │
//!   └────────────────────────────────────────────────────────────┘
//!                                  │ watch channels
//!                                  ▼
//!                     SyncManager ──▶ global stores
//! ```
//!
//! Components read from the global stores (`DEVICE_CARDS`, `CONNECTIVITY`),
//! not from the socket.

mod connection;
mod dispatcher;
mod engine;
mod hooks;
mod manager;
mod queue;

pub use connection::{
    Backoff, ConnectionManager, ConnectionState, Connectivity, Intent, Link, ReconnectConfig,
    SyncHandle, WsConnection,
};
pub use dispatcher::{DispatchStats, Dispatched, InboundDispatcher};
pub use engine::SyncEngine;
pub use hooks::{use_connectivity, use_sync_handle};
pub use manager::SyncManager;
pub use queue::{LinkClosed, OutboundQueue};
