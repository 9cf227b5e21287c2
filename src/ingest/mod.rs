// src/ingest/mod.rs
pub mod providers;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;

use crate::change_detector::is_new;
use crate::ingest::types::{SourceKind, SourceProvider};
use crate::notify::Notifier;
use crate::state_store::StateStore;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("poll_ticks_total", "Completed poll ticks.");
        describe_counter!(
            "source_fetch_errors_total",
            "Source fetches that failed (network, status, parse)."
        );
        describe_counter!("notifications_sent_total", "Announcements delivered.");
        describe_counter!(
            "notifications_failed_total",
            "Announcements lost to delivery errors."
        );
        describe_counter!("state_persist_errors_total", "Failed state file writes.");
        describe_gauge!("poll_last_run_ts", "Unix ts when the last tick finished.");
    });
}

/// What happened to one source during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// New item announced; carries its id.
    Notified(String),
    /// New item recorded but the announcement was lost.
    DeliveryFailed(String),
    Unchanged,
    /// Source has nothing usable yet.
    Empty,
    FetchFailed,
}

/// Owns the sources, the state store and the notifier. Only the poll loop
/// touches it, so no locking.
pub struct Poller {
    providers: Vec<Box<dyn SourceProvider>>,
    store: StateStore,
    notifier: Arc<dyn Notifier>,
}

impl Poller {
    pub fn new(
        providers: Vec<Box<dyn SourceProvider>>,
        store: StateStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            providers,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn sources(&self) -> Vec<SourceKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Checks every source in order. One source failing never stops the next.
    pub async fn tick(&mut self) -> Vec<(SourceKind, CheckOutcome)> {
        let mut out = Vec::with_capacity(self.providers.len());
        for p in &self.providers {
            let outcome = check_source(p.as_ref(), &mut self.store, self.notifier.as_ref()).await;
            out.push((p.kind(), outcome));
        }

        counter!("poll_ticks_total").increment(1);
        gauge!("poll_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        out
    }
}

/// fetch → compare → persist → announce, for a single source.
///
/// State is advanced before sending, so a delivery failure loses that
/// announcement instead of repeating it on every tick.
pub async fn check_source(
    provider: &dyn SourceProvider,
    store: &mut StateStore,
    notifier: &dyn Notifier,
) -> CheckOutcome {
    let source = provider.kind();

    let item = match provider.fetch_latest().await {
        Ok(Some(item)) => item,
        Ok(None) => {
            tracing::debug!(%source, "no item available");
            return CheckOutcome::Empty;
        }
        Err(e) => {
            counter!("source_fetch_errors_total", "source" => source.name()).increment(1);
            tracing::warn!(%source, "fetch failed: {e}");
            return CheckOutcome::FetchFailed;
        }
    };

    if !is_new(store.last_seen(source), &item.id) {
        tracing::trace!(%source, id = %item.id, "no change");
        return CheckOutcome::Unchanged;
    }

    store.update(source, &item.id).await;

    match notifier.send(source, &item).await {
        Ok(()) => {
            counter!("notifications_sent_total", "source" => source.name()).increment(1);
            tracing::info!(
                %source,
                id = %item.id,
                title = item.title.as_deref().unwrap_or_default(),
                "announced new upload"
            );
            CheckOutcome::Notified(item.id)
        }
        Err(e) => {
            counter!("notifications_failed_total", "source" => source.name()).increment(1);
            tracing::error!(%source, id = %item.id, "notification failed, not retried: {e}");
            CheckOutcome::DeliveryFailed(item.id)
        }
    }
}
