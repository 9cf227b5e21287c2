// src/ingest/scheduler.rs
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::{self, MissedTickBehavior};

use crate::ingest::Poller;
use crate::state_store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoggedIn,
    Polling,
}

#[derive(Clone, Copy, Debug)]
pub struct SchedulerCfg {
    pub interval: Duration,
    /// Grace period between login and the first tick, so a fresh deploy
    /// doesn't race the state file.
    pub startup_delay: Duration,
}

/// Drives `Idle → LoggedIn → Polling`.
#[derive(Debug)]
pub struct Scheduler {
    cfg: SchedulerCfg,
    phase: Phase,
}

impl Scheduler {
    pub fn new(cfg: SchedulerCfg) -> Self {
        Self {
            cfg,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Call once the messaging session is authenticated.
    pub fn mark_logged_in(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::LoggedIn;
        }
    }

    /// Polls forever. Ticks run one after another; a tick that overruns the
    /// interval delays the next one instead of overlapping it.
    ///
    /// The state file is read only after the startup delay, so a file that
    /// shows up during the grace period is honoured instead of overwritten.
    pub async fn run<F>(mut self, state_path: impl Into<PathBuf>, make_poller: F) -> Result<()>
    where
        F: FnOnce(StateStore) -> Poller,
    {
        if self.phase != Phase::LoggedIn {
            bail!("scheduler started in phase {:?}, expected LoggedIn", self.phase);
        }

        if !self.cfg.startup_delay.is_zero() {
            tracing::info!(
                delay_secs = self.cfg.startup_delay.as_secs(),
                "waiting before first poll"
            );
            time::sleep(self.cfg.startup_delay).await;
        }

        let store = StateStore::load(state_path).await;
        let mut poller = make_poller(store);
        self.phase = Phase::Polling;
        tracing::info!(
            interval_secs = self.cfg.interval.as_secs(),
            sources = ?poller.sources(),
            "polling started"
        );

        let mut ticker = time::interval(self.cfg.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let outcomes = poller.tick().await;
            tracing::debug!(?outcomes, "tick done");
        }
    }
}
