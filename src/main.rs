//! media-notifier — binary entrypoint.
//! Loads config, logs the bot in, starts the health server and the poll loop.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use media_notifier::config::AppConfig;
use media_notifier::ingest::scheduler::{Scheduler, SchedulerCfg};
use media_notifier::metrics::Metrics;
use media_notifier::notify::{DiscordNotifier, DiscordSession, Notifier};
use media_notifier::{api, build_poller, http_client};

/// Compact logs by default, JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("media_notifier=info,warn"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn serve_health(router: axum::Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding health server on {addr}"))?;
    tracing::info!(%addr, "health endpoint listening");
    axum::serve(listener, router).await.context("health server")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default().context("loading configuration")?;
    tracing::info!(
        channel = %cfg.media_channel,
        youtube = cfg.youtube_channel_id.as_deref().unwrap_or("-"),
        tiktok = cfg.tiktok_username.as_deref().unwrap_or("-"),
        interval_secs = cfg.check_interval.as_secs(),
        "config loaded"
    );

    let mut router = api::router();
    if Metrics::enabled_from_env() {
        let metrics = Metrics::init()?;
        router = router.merge(metrics.router());
    }
    let port = api::port_from_env();
    tokio::spawn(async move {
        if let Err(e) = serve_health(router, port).await {
            tracing::error!("health server stopped: {e:#}");
        }
    });

    let client = http_client(&cfg)?;
    let mut scheduler = Scheduler::new(SchedulerCfg {
        interval: cfg.check_interval,
        startup_delay: cfg.startup_delay,
    });

    let session = DiscordSession::login(client.clone(), &cfg.secrets.discord_token)
        .await
        .context("discord login")?;
    tracing::info!(user = %session.user().username, id = %session.user().id, "logged in");
    scheduler.mark_logged_in();

    let notifier: Arc<dyn Notifier> = Arc::new(DiscordNotifier::new(session, cfg.media_channel.clone()));
    scheduler
        .run(cfg.state_path.clone(), |store| {
            build_poller(&cfg, &client, notifier, store)
        })
        .await
}
