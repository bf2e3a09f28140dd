//! Connection lifecycle: open/close handling, backoff and send-or-queue.

use std::time::{Duration, Instant};

use devsync_shared::OutboundCommand;
use tracing::{debug, info, warn};

use super::{Backoff, ConnectionState, Connectivity, Link, ReconnectConfig};
use crate::ws::queue::OutboundQueue;

/// Owns the connection state, the retry policy and the outbound queue.
///
/// Transport-agnostic: the driver reports open/close/error events and hands
/// over a [`Link`] for every successful attempt.
pub struct ConnectionManager<L> {
    state: ConnectionState,
    backoff: Backoff,
    manually_closed: bool,
    link: Option<L>,
    queue: OutboundQueue,
    connectivity: Connectivity,
}

impl<L: Link> ConnectionManager<L> {
    /// Starts in `Connecting`: the driver is expected to begin the first attempt immediately.
    pub fn new(config: ReconnectConfig) -> Self {
        Self {
            state: ConnectionState::Connecting { attempt: 0 },
            backoff: Backoff::new(config),
            manually_closed: false,
            link: None,
            queue: OutboundQueue::new(),
            connectivity: Connectivity::Disconnected,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open() && self.link.is_some()
    }

    pub fn is_shut_down(&self) -> bool {
        self.manually_closed
    }

    pub fn queue(&self) -> &OutboundQueue {
        &self.queue
    }

    /// Delay the next unintentional close will wait before reconnecting.
    pub fn retry_delay(&self) -> Duration {
        self.backoff.current()
    }

    pub fn reconnect_deadline(&self) -> Option<Instant> {
        match self.state {
            ConnectionState::ReconnectWait { until, .. } => Some(until),
            _ => None,
        }
    }

    /// The transport finished its handshake.
    ///
    /// Resets the backoff, flushes the queue and asks for a full resync since
    /// broadcasts missed during the outage are otherwise lost.
    pub fn on_open(&mut self, link: L) {
        if self.manually_closed {
            debug!("connection opened after shutdown, dropping it");
            return;
        }

        info!("gateway connection open");
        self.state = ConnectionState::Open;
        self.connectivity = Connectivity::Connected;
        self.backoff.reset();
        self.link = Some(link);

        self.flush();
        self.send(OutboundCommand::List);
    }

    /// Transport-level error. Reported only; the close that follows drives the retry.
    pub fn on_error(&mut self, reason: &str) {
        warn!(reason, "gateway connection error");
        self.connectivity = Connectivity::Error;
    }

    /// The transport closed. Returns when the next attempt should start, if any.
    pub fn on_close(&mut self, now: Instant) -> Option<Instant> {
        self.link = None;

        if self.manually_closed {
            self.state = ConnectionState::Closed;
            return None;
        }

        let attempt = match self.state {
            // Already scheduled: a second close must not reschedule.
            ConnectionState::ReconnectWait { until, .. } => return Some(until),
            ConnectionState::Connecting { attempt } => attempt + 1,
            ConnectionState::Open => 1,
            ConnectionState::Closed => return None,
        };

        let delay = self.backoff.next_delay();
        let until = now + delay;
        info!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            queued = self.queue.len(),
            "gateway connection closed, reconnect scheduled"
        );
        self.state = ConnectionState::ReconnectWait { attempt, until };
        // An error reported before this close stays visible until the next open.
        if self.connectivity != Connectivity::Error {
            self.connectivity = Connectivity::Disconnected;
        }
        Some(until)
    }

    /// The backoff deadline passed. Returns `false` if there is nothing to retry.
    pub fn begin_attempt(&mut self) -> bool {
        match self.state {
            ConnectionState::ReconnectWait { attempt, .. } => {
                debug!(attempt, "reconnecting to gateway");
                self.state = ConnectionState::Connecting { attempt };
                true
            }
            _ => false,
        }
    }

    /// Transmit now if open, otherwise queue. Never fails for the caller.
    pub fn send(&mut self, command: OutboundCommand) {
        if !self.is_open() {
            debug!(?command, "connection not open, queueing");
            self.queue.enqueue(command);
            return;
        }

        if let Some(link) = self.link.as_mut() {
            if let Err(command) = link.transmit(command) {
                debug!(?command, "link refused command, queueing");
                self.link = None;
                self.queue.enqueue(command);
            }
        }
    }

    /// Close for good; no reconnect will be scheduled.
    pub fn shutdown(&mut self) {
        info!(dropped = self.queue.len(), "shutting down gateway connection");
        self.manually_closed = true;
        self.link = None;
        self.state = ConnectionState::Closed;
        self.connectivity = Connectivity::Disconnected;
    }

    fn flush(&mut self) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        match self.queue.drain_into(link) {
            Ok(0) => {}
            Ok(sent) => debug!(sent, "flushed outbound queue"),
            Err(closed) => {
                debug!(sent = closed.sent, left = self.queue.len(), "link went away mid-flush");
                self.link = None;
            }
        }
    }
}
