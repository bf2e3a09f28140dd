//! devsync - desktop entry point.

#![allow(non_snake_case)]

use anyhow::Context;
use devsync_client::{routes::Route, ApiClient, ClientConfig, SyncManager};
use dioxus::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("devsync_client=debug")),
        )
        .init();

    let config = ClientConfig::from_env().context("loading configuration")?;
    info!(server = %config.server_url, "starting devsync");

    dioxus::LaunchBuilder::desktop().with_context(config).launch(App);
    Ok(())
}

#[component]
fn App() -> Element {
    let config = use_context::<ClientConfig>();
    use_context_provider(|| ApiClient::new().with_base_url(config.server_url.as_str()));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SyncManager { config,
            Router::<Route> {}
        }
    }
}
