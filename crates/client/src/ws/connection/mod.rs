//! WebSocket connection with state management and auto-reconnect.
//!
//! This module provides the shared types (lifecycle state, backoff, the
//! intent handle) and includes the tokio-tungstenite transport driver.

use std::time::{Duration, Instant};

use devsync_shared::OutboundCommand;
use futures_channel::mpsc::UnboundedSender;

mod lifecycle;

pub use lifecycle::ConnectionManager;

/// Lifecycle state of the gateway connection.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// A connection attempt is in flight. `attempt` is 0 for the first one.
    Connecting { attempt: u32 },
    Open,
    /// Closed unintentionally; the next attempt starts at `until`.
    ReconnectWait { attempt: u32, until: Instant },
    /// Shut down on request. Terminal.
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

/// Connectivity as surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    Disconnected,
    Error,
}

impl Connectivity {
    pub fn label(&self) -> &'static str {
        match self {
            Connectivity::Connected => "connected",
            Connectivity::Disconnected => "disconnected",
            Connectivity::Error => "error",
        }
    }
}

/// Configuration for auto-reconnect behavior
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectConfig {
    /// First delay, and the value a successful open resets to
    pub floor: Duration,
    /// Maximum delay
    pub ceiling: Duration,
    /// Multiplier applied after every scheduled attempt
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            floor: Duration::from_millis(1000),
            ceiling: Duration::from_millis(30_000),
            multiplier: 1.6,
        }
    }
}

/// Bounded exponential backoff.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: ReconnectConfig,
    current: Duration,
}

impl Backoff {
    pub fn new(config: ReconnectConfig) -> Self {
        let current = config.floor;
        Self { config, current }
    }

    /// Delay to use for the next attempt. Scales the delay for the one after.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let scaled = self.current.mul_f64(self.config.multiplier);
        self.current = scaled.clamp(self.config.floor, self.config.ceiling.max(self.config.floor));
        delay
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.config.floor;
    }
}

/// The open half of a connection: something that accepts outbound commands.
///
/// A failed transmit hands the command back so it can be queued again.
pub trait Link {
    fn transmit(&mut self, command: OutboundCommand) -> Result<(), OutboundCommand>;
}

impl Link for UnboundedSender<OutboundCommand> {
    fn transmit(&mut self, command: OutboundCommand) -> Result<(), OutboundCommand> {
        self.unbounded_send(command).map_err(|e| e.into_inner())
    }
}

/// Something the user did to a control, or a request to the sync task.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Toggle { device: String, attribute: String },
    Slide { device: String, attribute: String, value: f64 },
    CommitNumber { device: String, attribute: String, raw: String },
    Select { device: String, attribute: String, choice: String },
    RequestDevice { device: String },
    Refresh,
    Shutdown,
}

/// Handle for sending user intents to the sync task.
///
/// Every method is fire-and-forget: if the task is gone the intent is dropped
/// with a debug log.
#[derive(Clone)]
pub struct SyncHandle {
    sender: UnboundedSender<Intent>,
}

impl SyncHandle {
    pub(crate) fn new(sender: UnboundedSender<Intent>) -> Self {
        Self { sender }
    }

    pub fn submit(&self, intent: Intent) {
        if let Err(e) = self.sender.unbounded_send(intent) {
            tracing::debug!(intent = ?e.into_inner(), "sync task is gone, dropping intent");
        }
    }

    pub fn toggle(&self, device: &str, attribute: &str) {
        self.submit(Intent::Toggle {
            device: device.to_string(),
            attribute: attribute.to_string(),
        });
    }

    pub fn slide(&self, device: &str, attribute: &str, value: f64) {
        self.submit(Intent::Slide {
            device: device.to_string(),
            attribute: attribute.to_string(),
            value,
        });
    }

    pub fn commit_number(&self, device: &str, attribute: &str, raw: &str) {
        self.submit(Intent::CommitNumber {
            device: device.to_string(),
            attribute: attribute.to_string(),
            raw: raw.to_string(),
        });
    }

    pub fn select(&self, device: &str, attribute: &str, choice: &str) {
        self.submit(Intent::Select {
            device: device.to_string(),
            attribute: attribute.to_string(),
            choice: choice.to_string(),
        });
    }

    /// Ask the gateway for a fresh snapshot of one device.
    pub fn request_device(&self, device: &str) {
        self.submit(Intent::RequestDevice {
            device: device.to_string(),
        });
    }

    /// Ask the gateway for a full resync.
    pub fn refresh(&self) {
        self.submit(Intent::Refresh);
    }

    /// Close the connection for good.
    pub fn shutdown(&self) {
        self.submit(Intent::Shutdown);
    }
}

impl PartialEq for SyncHandle {
    fn eq(&self, other: &Self) -> bool {
        self.sender.same_receiver(&other.sender)
    }
}

mod connection_native;
pub use connection_native::WsConnection;
