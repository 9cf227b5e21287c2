//! Posts one sample announcement per source into the configured channel,
//! to check the bot's permissions and the message layout. State is untouched.

use anyhow::{Context, Result};
use media_notifier::config::AppConfig;
use media_notifier::{http_client, DiscordNotifier, DiscordSession, MediaItem, Notifier, SourceKind};

fn sample(source: SourceKind) -> MediaItem {
    match source {
        SourceKind::YouTube => MediaItem {
            id: "dQw4w9WgXcQ".into(),
            title: Some("notify-demo sample video".into()),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".into()),
        },
        SourceKind::TikTok => MediaItem {
            id: "7000000000000000000".into(),
            title: None,
            url: "https://www.tiktok.com/@tiktok/video/7000000000000000000".into(),
            thumbnail_url: None,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = AppConfig::load_default().context("loading configuration")?;
    let client = http_client(&cfg)?;
    let session = DiscordSession::login(client, &cfg.secrets.discord_token)
        .await
        .context("discord login")?;
    let notifier = DiscordNotifier::new(session, cfg.media_channel.clone());

    for source in SourceKind::ALL {
        match notifier.send(source, &sample(source)).await {
            Ok(()) => tracing::info!(%source, "sample sent"),
            Err(e) => tracing::error!(%source, "sample failed: {e}"),
        }
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    }

    println!("notify-demo done");
    Ok(())
}
