//! Dioxus glue: owns the gateway connection for the lifetime of the app.

use std::rc::Rc;

use dioxus::prelude::*;
use tracing::debug;

use super::connection::{SyncHandle, WsConnection};
use crate::config::ClientConfig;
use crate::stores::{set_cards, set_connectivity};

/// Component that owns the gateway connection.
///
/// Mirrors published cards and connectivity into the global stores and
/// provides a [`SyncHandle`] to descendants. The connection is shut down
/// when the component unmounts.
#[component]
pub fn SyncManager(config: ClientConfig, children: Element) -> Element {
    let connection = use_hook(|| Rc::new(WsConnection::new(&config)));

    // Mirror tasks: watch channels -> global signals
    use_hook({
        let connection = connection.clone();
        move || {
            let mut cards = connection.cards();
            spawn(async move {
                loop {
                    set_cards(cards.borrow_and_update().clone());
                    if cards.changed().await.is_err() {
                        debug!("card publisher gone");
                        break;
                    }
                }
            });

            let mut connectivity = connection.connectivity();
            spawn(async move {
                loop {
                    set_connectivity(*connectivity.borrow_and_update());
                    if connectivity.changed().await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    let handle = use_context_provider(|| connection.handle());
    use_drop(move || handle.shutdown());

    children
}
