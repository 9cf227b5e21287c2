// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod change_detector;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod state_store;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::ingest::providers::{tiktok::TikTokProvider, youtube::YouTubeProvider};
use crate::ingest::types::SourceProvider;

pub use crate::ingest::types::{MediaItem, SourceKind};
pub use crate::ingest::{CheckOutcome, Poller};
pub use crate::notify::{DiscordNotifier, DiscordSession, Notifier};
pub use crate::state_store::StateStore;

/// Shared outbound HTTP client, honouring the optional request timeout.
pub fn http_client(cfg: &AppConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(t) = cfg.request_timeout {
        builder = builder.timeout(t);
    }
    builder.build().context("building http client")
}

/// Providers for every configured source, YouTube first.
pub fn build_providers(cfg: &AppConfig, client: &reqwest::Client) -> Vec<Box<dyn SourceProvider>> {
    let mut providers: Vec<Box<dyn SourceProvider>> = Vec::new();
    if let (Some(channel), Some(key)) = (&cfg.youtube_channel_id, &cfg.secrets.youtube_api_key) {
        providers.push(Box::new(YouTubeProvider::new(
            client.clone(),
            key.clone(),
            channel.clone(),
        )));
    }
    if let Some(user) = &cfg.tiktok_username {
        providers.push(Box::new(TikTokProvider::new(client.clone(), user)));
    }
    providers
}

/// Wires the configured sources, a loaded state store and the notifier.
pub fn build_poller(
    cfg: &AppConfig,
    client: &reqwest::Client,
    notifier: Arc<dyn Notifier>,
    store: StateStore,
) -> Poller {
    Poller::new(build_providers(cfg, client), store, notifier)
}
