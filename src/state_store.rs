use std::path::PathBuf;

use metrics::counter;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::error::PersistenceError;
use crate::ingest::types::SourceKind;

pub const DEFAULT_STATE_PATH: &str = "cache.json";

/// On-disk shape. Key names match state files written by earlier deployments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSeen {
    #[serde(default, deserialize_with = "lenient_id")]
    pub last_youtube_video: String,
    #[serde(default, rename = "lastTikTokVideo", deserialize_with = "lenient_id")]
    pub last_tiktok_video: String,
}

/// Hand-edited files may carry numbers or nulls. A bad value only empties its
/// own key.
fn lenient_id<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl LastSeen {
    pub fn get(&self, source: SourceKind) -> &str {
        match source {
            SourceKind::YouTube => &self.last_youtube_video,
            SourceKind::TikTok => &self.last_tiktok_video,
        }
    }

    fn set(&mut self, source: SourceKind, id: String) {
        match source {
            SourceKind::YouTube => self.last_youtube_video = id,
            SourceKind::TikTok => self.last_tiktok_video = id,
        }
    }
}

/// Last-seen id per source, mirrored to a JSON file.
///
/// Owned by the poll loop, which is the only writer.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: LastSeen,
}

impl StateStore {
    /// Missing or unreadable file ⇒ start empty and write the default right away.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let loaded = match fs::read_to_string(&path).await {
            Ok(s) => match serde_json::from_str::<LastSeen>(&s) {
                Ok(st) => Some(st),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "state file unparseable, resetting: {e}");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no state file, starting fresh");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "state file unreadable, resetting: {e}");
                None
            }
        };

        let fresh = loaded.is_none();
        let store = Self {
            path,
            state: loaded.unwrap_or_default(),
        };
        if fresh {
            store.persist_logged().await;
        }
        store
    }

    pub fn last_seen(&self, source: SourceKind) -> &str {
        self.state.get(source)
    }

    pub fn snapshot(&self) -> &LastSeen {
        &self.state
    }

    /// Overwrites the id in memory, then persists. A failed write is logged
    /// and the in-memory value is kept.
    pub async fn update(&mut self, source: SourceKind, id: &str) {
        self.state.set(source, id.to_string());
        self.persist_logged().await;
    }

    /// Writes the full snapshot (temp file + rename).
    pub async fn persist(&self) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(&self.state)?;
        let io_err = |source: std::io::Error| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await.map_err(io_err)?;
        fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    async fn persist_logged(&self) {
        if let Err(e) = self.persist().await {
            counter!("state_persist_errors_total").increment(1);
            tracing::error!("state persist failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_defaults_and_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cache.json");

        let store = StateStore::load(&p).await;
        assert_eq!(store.last_seen(SourceKind::YouTube), "");
        assert_eq!(store.last_seen(SourceKind::TikTok), "");

        let on_disk: LastSeen =
            serde_json::from_str(&std::fs::read_to_string(&p).unwrap()).unwrap();
        assert_eq!(on_disk, LastSeen::default());
    }

    #[tokio::test]
    async fn update_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cache.json");

        let mut store = StateStore::load(&p).await;
        store.update(SourceKind::YouTube, "abc").await;
        store.update(SourceKind::TikTok, "999").await;

        let reloaded = StateStore::load(&p).await;
        assert_eq!(reloaded.last_seen(SourceKind::YouTube), "abc");
        assert_eq!(reloaded.last_seen(SourceKind::TikTok), "999");
    }

    #[tokio::test]
    async fn reads_legacy_file_with_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cache.json");
        std::fs::write(&p, r#"{"lastYoutubeVideo":"yt1"}"#).unwrap();

        let store = StateStore::load(&p).await;
        assert_eq!(store.last_seen(SourceKind::YouTube), "yt1");
        assert_eq!(store.last_seen(SourceKind::TikTok), "");
    }

    #[tokio::test]
    async fn bad_value_only_empties_its_own_key() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cache.json");
        std::fs::write(&p, r#"{"lastYoutubeVideo":"yt1","lastTikTokVideo":null}"#).unwrap();

        let store = StateStore::load(&p).await;
        assert_eq!(store.last_seen(SourceKind::YouTube), "yt1");
        assert_eq!(store.last_seen(SourceKind::TikTok), "");

        std::fs::write(
            &p,
            r#"{"lastYoutubeVideo":["x"],"lastTikTokVideo":7301234567890}"#,
        )
        .unwrap();
        let store = StateStore::load(&p).await;
        assert_eq!(store.last_seen(SourceKind::YouTube), "");
        assert_eq!(store.last_seen(SourceKind::TikTok), "7301234567890");
    }

    #[tokio::test]
    async fn hand_edited_garbage_resets_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("cache.json");
        std::fs::write(&p, "{ not json").unwrap();

        let store = StateStore::load(&p).await;
        assert_eq!(store.snapshot(), &LastSeen::default());
        let text = std::fs::read_to_string(&p).unwrap();
        assert!(text.contains("lastTikTokVideo"));
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // parent is a regular file, so create_dir_all fails
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let p = blocker.join("cache.json");

        let mut store = StateStore::load(&p).await;
        store.update(SourceKind::YouTube, "abc").await;
        assert_eq!(store.last_seen(SourceKind::YouTube), "abc");
        assert!(store.persist().await.is_err());
    }
}
