// tests/scheduler_run.rs
//
// Scheduler lifecycle on a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use media_notifier::error::DeliveryError;
use media_notifier::ingest::providers::youtube::YouTubeProvider;
use media_notifier::ingest::scheduler::{Scheduler, SchedulerCfg};
use media_notifier::{MediaItem, Notifier, Poller, SourceKind, StateStore};

#[derive(Default)]
struct CountingNotifier {
    ids: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _source: SourceKind, item: &MediaItem) -> Result<(), DeliveryError> {
        self.ids.lock().unwrap().push(item.id.clone());
        Ok(())
    }
}

fn cfg() -> SchedulerCfg {
    SchedulerCfg {
        interval: Duration::from_secs(60),
        startup_delay: Duration::from_secs(15),
    }
}

fn poller_with(rec: Arc<CountingNotifier>) -> impl FnOnce(StateStore) -> Poller {
    move |store| {
        let yt = YouTubeProvider::from_fixture(include_str!("fixtures/youtube_search.json"));
        Poller::new(vec![Box::new(yt)], store, rec)
    }
}

#[tokio::test]
async fn refuses_to_poll_before_login() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let rec = Arc::new(CountingNotifier::default());

    let res = Scheduler::new(cfg())
        .run(path.clone(), poller_with(rec.clone()))
        .await;
    assert!(res.is_err());
    assert!(rec.ids.lock().unwrap().is_empty());
    assert!(!path.exists(), "state is not touched before login");
}

#[tokio::test(start_paused = true)]
async fn polls_after_grace_and_never_repeats() {
    let dir = tempfile::tempdir().unwrap();
    let rec = Arc::new(CountingNotifier::default());

    let mut scheduler = Scheduler::new(cfg());
    scheduler.mark_logged_in();

    // Several intervals worth of ticks, then give up waiting.
    let res = tokio::time::timeout(
        Duration::from_secs(15 + 60 * 5),
        scheduler.run(dir.path().join("cache.json"), poller_with(rec.clone())),
    )
    .await;
    assert!(res.is_err(), "run() only returns on error");

    assert_eq!(*rec.ids.lock().unwrap(), vec!["abc".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn state_file_appearing_during_grace_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let rec = Arc::new(CountingNotifier::default());

    // A redeploy restores the previous state file a few seconds after boot.
    let restore = {
        let path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            std::fs::write(&path, r#"{"lastYoutubeVideo":"abc","lastTikTokVideo":""}"#)
                .unwrap();
        })
    };

    let mut scheduler = Scheduler::new(cfg());
    scheduler.mark_logged_in();

    let res = tokio::time::timeout(
        Duration::from_secs(15 + 60 * 2),
        scheduler.run(path.clone(), poller_with(rec.clone())),
    )
    .await;
    assert!(res.is_err());
    restore.await.unwrap();

    assert!(rec.ids.lock().unwrap().is_empty(), "already-seen id must not be re-announced");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"abc\""));
}
