//! Client configuration, read from the environment.

use std::time::Duration;

use anyhow::{bail, Context};
use url::Url;

use crate::projector::DEFAULT_DEBOUNCE;
use crate::ws::ReconnectConfig;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// HTTP base of the gateway. The socket URL is derived from it.
    pub server_url: Url,
    /// Access token passed to the socket as the `token` query parameter.
    pub token: Option<String>,
    /// Quiet window for slider input.
    pub debounce: Duration,
    pub reconnect: ReconnectConfig,
}

impl ClientConfig {
    /// Defaults pointed at `server_url`.
    pub fn for_server(server_url: &str) -> anyhow::Result<Self> {
        let server_url = Url::parse(server_url)
            .with_context(|| format!("invalid server url {server_url:?}"))?;
        if !matches!(server_url.scheme(), "http" | "https") {
            bail!("server url must be http or https, got {}", server_url.scheme());
        }
        Ok(Self {
            server_url,
            token: None,
            debounce: DEFAULT_DEBOUNCE,
            reconnect: ReconnectConfig::default(),
        })
    }

    /// Read `DEVSYNC_*` variables. Unparseable numbers fall back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let server = std::env::var("DEVSYNC_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::for_server(&server)?;

        config.token = std::env::var("DEVSYNC_TOKEN").ok().filter(|t| !t.is_empty());
        if let Some(ms) = env_millis("DEVSYNC_DEBOUNCE_MS") {
            config.debounce = ms;
        }
        if let Some(ms) = env_millis("DEVSYNC_RECONNECT_FLOOR_MS") {
            config.reconnect.floor = ms;
        }
        if let Some(ms) = env_millis("DEVSYNC_RECONNECT_CEILING_MS") {
            config.reconnect.ceiling = ms;
        }
        if config.reconnect.ceiling < config.reconnect.floor {
            tracing::warn!(
                floor_ms = config.reconnect.floor.as_millis() as u64,
                ceiling_ms = config.reconnect.ceiling.as_millis() as u64,
                "reconnect ceiling below floor, raising it"
            );
            config.reconnect.ceiling = config.reconnect.floor;
        }

        Ok(config)
    }

    /// The gateway's WebSocket endpoint: `ws(s)://<host>/ws[?token=..]`.
    pub fn ws_url(&self) -> Url {
        let mut url = self.server_url.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) -> ws(s) is always an allowed scheme change.
        let _ = url.set_scheme(scheme);
        url.set_path("/ws");
        url.set_query(None);
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        url
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring invalid millisecond value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_follows_scheme() {
        let config = ClientConfig::for_server("http://gateway.local:8000").unwrap();
        assert_eq!(config.ws_url().as_str(), "ws://gateway.local:8000/ws");

        let config = ClientConfig::for_server("https://gateway.example.com/").unwrap();
        assert_eq!(config.ws_url().as_str(), "wss://gateway.example.com/ws");
    }

    #[test]
    fn ws_url_carries_token() {
        let mut config = ClientConfig::for_server("http://127.0.0.1:8000").unwrap();
        config.token = Some("s3cret&x".into());
        assert_eq!(
            config.ws_url().as_str(),
            "ws://127.0.0.1:8000/ws?token=s3cret%26x"
        );
    }

    #[test]
    fn rejects_non_http_server() {
        assert!(ClientConfig::for_server("ftp://gateway").is_err());
        assert!(ClientConfig::for_server("not a url").is_err());
    }
}
