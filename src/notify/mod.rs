pub mod discord;
pub mod message;

use crate::error::DeliveryError;
use crate::ingest::types::{MediaItem, SourceKind};

pub use discord::{DiscordNotifier, DiscordSession};

/// Delivers one "new upload" announcement. At-most-once: callers never retry.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, source: SourceKind, item: &MediaItem) -> Result<(), DeliveryError>;
}
