//! Desktop transport using tokio-tungstenite.
//!
//! One driver task owns the [`SyncEngine`] and is the only thing that mutates
//! it. Per connection a writer task owns the socket's sink and receives
//! commands over a channel; that channel's sender is the engine's [`Link`].

use std::future::{pending, Future};
use std::pin::Pin;
use std::time::{Duration, Instant};

use anyhow::Context;
use devsync_shared::OutboundCommand;
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use super::{Connectivity, Intent, SyncHandle};
use crate::config::ClientConfig;
use crate::projector::DeviceCard;
use crate::ws::engine::SyncEngine;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type ConnectFuture = Pin<Box<dyn Future<Output = anyhow::Result<WsStream>> + Send>>;

/// A running synchronization session with the gateway.
///
/// Dropping it does not stop the driver; call [`SyncHandle::shutdown`].
pub struct WsConnection {
    handle: SyncHandle,
    cards: watch::Receiver<Vec<DeviceCard>>,
    connectivity: watch::Receiver<Connectivity>,
}

impl WsConnection {
    /// Spawn the driver on the current tokio runtime and start connecting.
    pub fn new(config: &ClientConfig) -> Self {
        let (intent_tx, intent_rx) = unbounded();
        let (cards_tx, cards) = watch::channel(Vec::new());
        let (connectivity_tx, connectivity) = watch::channel(Connectivity::Disconnected);

        let engine = SyncEngine::new(config.debounce, config.reconnect.clone());
        let driver = Driver {
            url: config.ws_url(),
            connect_timeout: config.reconnect.ceiling,
            engine,
            intents: intent_rx,
            cards: cards_tx,
            connectivity: connectivity_tx,
        };
        tokio::spawn(driver.run());

        Self {
            handle: SyncHandle::new(intent_tx),
            cards,
            connectivity,
        }
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    /// Device cards, republished whenever one changes.
    pub fn cards(&self) -> watch::Receiver<Vec<DeviceCard>> {
        self.cards.clone()
    }

    pub fn connectivity(&self) -> watch::Receiver<Connectivity> {
        self.connectivity.clone()
    }
}

struct Driver {
    url: Url,
    /// A handshake that takes longer than this counts as a failed attempt.
    connect_timeout: Duration,
    engine: SyncEngine<UnboundedSender<OutboundCommand>>,
    intents: UnboundedReceiver<Intent>,
    cards: watch::Sender<Vec<DeviceCard>>,
    connectivity: watch::Sender<Connectivity>,
}

impl Driver {
    async fn run(mut self) {
        let mut connecting: Option<ConnectFuture> =
            Some(connect(&self.url, self.connect_timeout));
        let mut reader: Option<SplitStream<WsStream>> = None;
        info!(url = %redacted(&self.url), "connecting to gateway");

        loop {
            self.publish();
            if self.engine.is_shut_down() {
                break;
            }

            let debounce_at = self.engine.debounce_deadline();
            let reconnect_at = self.engine.reconnect_deadline();

            tokio::select! {
                result = wait_connect(&mut connecting) => {
                    connecting = None;
                    match result {
                        Ok(stream) => {
                            let (write, read) = stream.split();
                            let (tx, rx) = unbounded();
                            tokio::spawn(write_loop(write, rx));
                            reader = Some(read);
                            self.engine.on_open(tx);
                        }
                        Err(e) => {
                            self.engine.on_error(&format!("{e:#}"));
                            self.engine.on_close(Instant::now());
                        }
                    }
                }
                frame = next_frame(&mut reader) => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            debug!(len = text.len(), "frame received");
                            self.engine.on_frame(text.as_str());
                        }
                        Some(Ok(Message::Close(close))) => {
                            debug!(?close, "gateway sent close frame");
                            reader = None;
                            self.engine.on_close(Instant::now());
                        }
                        Some(Ok(_)) => {
                            // Binary, ping and pong frames carry nothing for us.
                        }
                        Some(Err(e)) => {
                            reader = None;
                            self.engine.on_error(&e.to_string());
                            self.engine.on_close(Instant::now());
                        }
                        None => {
                            reader = None;
                            self.engine.on_close(Instant::now());
                        }
                    }
                }
                intent = self.intents.next() => {
                    match intent {
                        Some(intent) => self.engine.apply(intent, Instant::now()),
                        None => self.engine.shutdown(),
                    }
                }
                _ = sleep_until(debounce_at) => {
                    self.engine.poll_timers(Instant::now());
                }
                _ = sleep_until(reconnect_at) => {
                    if self.engine.begin_attempt() {
                        connecting = Some(connect(&self.url, self.connect_timeout));
                    }
                }
            }
        }

        info!("sync driver stopped");
    }

    fn publish(&self) {
        let cards = self.engine.cards();
        self.cards.send_if_modified(|current| {
            if *current != cards {
                *current = cards;
                true
            } else {
                false
            }
        });

        let connectivity = self.engine.connectivity();
        self.connectivity.send_if_modified(|current| {
            if *current != connectivity {
                *current = connectivity;
                true
            } else {
                false
            }
        });
    }
}

fn connect(url: &Url, limit: Duration) -> ConnectFuture {
    let url = url.to_string();
    Box::pin(async move {
        let (stream, _response) = tokio::time::timeout(limit, connect_async(url))
            .await
            .with_context(|| format!("handshake timed out after {}ms", limit.as_millis()))??;
        Ok(stream)
    })
}

async fn wait_connect(attempt: &mut Option<ConnectFuture>) -> anyhow::Result<WsStream> {
    match attempt {
        Some(fut) => fut.await,
        None => pending().await,
    }
}

async fn next_frame(
    reader: &mut Option<SplitStream<WsStream>>,
) -> Option<Result<Message, tungstenite::Error>> {
    match reader {
        Some(read) => read.next().await,
        None => pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => pending().await,
    }
}

/// Serialize and send commands until the engine drops the sender or the socket fails.
async fn write_loop(
    mut write: SplitSink<WsStream, Message>,
    mut commands: UnboundedReceiver<OutboundCommand>,
) {
    while let Some(command) = commands.next().await {
        let frame = match command.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, ?command, "failed to serialize command");
                continue;
            }
        };
        debug!(%frame, "sending");
        if let Err(e) = write.send(Message::Text(frame.into())).await {
            warn!(error = %e, "send failed");
            break;
        }
    }
    let _ = write.close().await;
}

/// The socket URL without its query, so tokens stay out of logs.
fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url
}
