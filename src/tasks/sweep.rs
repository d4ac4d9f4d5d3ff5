//! Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! The sweeper is pure timing glue: it holds no cache state and talks to
//! the engine only through its public operations, so an external cron-like
//! driver calling `sweep_expired` itself is a drop-in replacement.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheEngine;
use crate::codec::Codec;
use crate::store::DurableStore;

// == Sweeper ==
/// Cancellable periodic driver for the engine's eviction pass.
#[derive(Debug, Default)]
pub struct Sweeper {
    handle: Option<JoinHandle<()>>,
    shutdown: Option<watch::Sender<bool>>,
}

impl Sweeper {
    /// Creates a sweeper that is not yet running.
    pub fn new() -> Self {
        Self::default()
    }

    // == Start ==
    /// Starts sweeping every `period`. The first pass runs immediately.
    ///
    /// Idempotent: starting an already-running sweeper is a no-op.
    pub fn start<S, C>(&mut self, engine: CacheEngine<S, C>, period: Duration)
    where
        S: DurableStore,
        C: Codec + 'static,
    {
        if self.is_running() {
            return;
        }

        let (tx, mut rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            info!(period_secs = period.as_secs(), "sweep task started");
            let mut ticker = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = rx.changed() => break,
                }

                // Cancellation is only observed between ticks; a pass that
                // has begun always runs to completion.
                match engine.sweep_expired(Utc::now()).await {
                    Ok(0) => debug!("sweep: no expired entries"),
                    Ok(removed) => info!(removed, "sweep: removed expired entries"),
                    // A lost pass only delays eviction; keep the schedule
                    Err(err) => warn!(%err, "sweep pass failed"),
                }
            }

            info!("sweep task stopped");
        });

        self.handle = Some(handle);
        self.shutdown = Some(tx);
    }

    // == Status ==
    /// Whether a sweep task is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    // == Stop ==
    /// Cancels future ticks. A tick already in flight completes.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        self.handle = None;
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
