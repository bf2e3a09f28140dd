//! The synchronization core: connection, queue, store and projector behind one owner.
//!
//! `SyncEngine` does no I/O. The transport driver feeds it socket events, user
//! intents and timer expiries, and reads back deadlines and cards to publish.

use std::time::{Duration, Instant};

use devsync_shared::OutboundCommand;
use tracing::info;

use super::connection::{ConnectionManager, Connectivity, Intent, Link, ReconnectConfig};
use super::dispatcher::{DispatchStats, Dispatched, InboundDispatcher};
use crate::projector::{DeviceCard, ViewProjector};
use crate::state_store::StateStore;

pub struct SyncEngine<L> {
    connection: ConnectionManager<L>,
    store: StateStore,
    projector: ViewProjector,
    dispatcher: InboundDispatcher,
}

impl<L: Link> SyncEngine<L> {
    pub fn new(debounce: Duration, reconnect: ReconnectConfig) -> Self {
        Self {
            connection: ConnectionManager::new(reconnect),
            store: StateStore::new(),
            projector: ViewProjector::new(debounce),
            dispatcher: InboundDispatcher::new(),
        }
    }

    pub fn on_open(&mut self, link: L) {
        self.connection.on_open(link);
    }

    pub fn on_error(&mut self, reason: &str) {
        self.connection.on_error(reason);
    }

    pub fn on_close(&mut self, now: Instant) -> Option<Instant> {
        self.connection.on_close(now)
    }

    pub fn on_frame(&mut self, text: &str) -> Dispatched {
        self.dispatcher.dispatch(text, &mut self.store, &mut self.projector)
    }

    /// Apply a user intent. Resulting commands go out now or wait in the queue.
    pub fn apply(&mut self, intent: Intent, now: Instant) {
        let command = match intent {
            Intent::Toggle { device, attribute } => self.projector.toggle(&device, &attribute),
            Intent::Slide {
                device,
                attribute,
                value,
            } => {
                self.projector.slide(&device, &attribute, value, now);
                None
            }
            Intent::CommitNumber {
                device,
                attribute,
                raw,
            } => self.projector.commit_number(&device, &attribute, &raw),
            Intent::Select {
                device,
                attribute,
                choice,
            } => self.projector.select(&device, &attribute, &choice),
            Intent::RequestDevice { device } => Some(OutboundCommand::get(device)),
            Intent::Refresh => Some(OutboundCommand::List),
            Intent::Shutdown => {
                self.shutdown();
                None
            }
        };

        if let Some(command) = command {
            self.connection.send(command);
        }
    }

    /// Fire every debounce window that has elapsed.
    pub fn poll_timers(&mut self, now: Instant) {
        for command in self.projector.poll_debounced(now) {
            self.connection.send(command);
        }
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.projector.next_deadline()
    }

    pub fn reconnect_deadline(&self) -> Option<Instant> {
        self.connection.reconnect_deadline()
    }

    pub fn begin_attempt(&mut self) -> bool {
        self.connection.begin_attempt()
    }

    pub fn shutdown(&mut self) {
        if !self.connection.is_shut_down() {
            info!(stats = ?self.dispatcher.stats(), "sync engine stopping");
            self.connection.shutdown();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.connection.is_shut_down()
    }

    pub fn cards(&self) -> Vec<DeviceCard> {
        self.projector.cards().cloned().collect()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connection.connectivity()
    }

    pub fn connection(&self) -> &ConnectionManager<L> {
        &self.connection
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn projector(&self) -> &ViewProjector {
        &self.projector
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }
}
