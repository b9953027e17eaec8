//! Stress Worker Loop
//!
//! One worker repeatedly acquires and releases a single named distributed
//! lock, measuring the gap between consecutive acquisitions. The interesting
//! number is the worst such gap: it bounds how long the cluster made any one
//! client wait during the run.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, mpsc};

use crate::dlock::client::DistributedRwLock;

/// A progress dot is forced on every Nth iteration even when no new maximum
/// was observed, as a liveness heartbeat.
const HEARTBEAT_EVERY: usize = 100;

/// What each worker sends on the result channel when its loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    /// Acquire/release cycles actually completed.
    pub iterations: usize,
    /// Largest gap observed between two consecutive acquisitions.
    pub worst_delay: Duration,
}

/// Running maximum over the inter-iteration gaps of one worker.
#[derive(Debug, Default)]
pub struct DelayTracker {
    worst: Duration,
}

impl DelayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one gap. Returns `true` when it set a new maximum.
    pub fn record(&mut self, gap: Duration) -> bool {
        if gap > self.worst {
            self.worst = gap;
            true
        } else {
            false
        }
    }

    pub fn worst(&self) -> Duration {
        self.worst
    }
}

/// Drives one named lock through up to `budget` acquire/release cycles.
///
/// The stop flag is checked only at the top of the loop: an iteration in
/// flight always finishes and releases its lock before the flag is seen.
/// On the first successful acquisition both the shared start timestamp and
/// the local gap baseline are reset to now, so the time spent waiting for
/// peers to come online does not skew the measurements.
///
/// Exactly one `WorkerReport` is sent on `reports` before the worker exits,
/// regardless of how the loop ended.
pub async fn lock_loop(
    mut lock: DistributedRwLock,
    budget: usize,
    stop: Arc<AtomicBool>,
    started: Arc<RwLock<Instant>>,
    reports: mpsc::Sender<WorkerReport>,
) {
    let mut tracker = DelayTracker::new();
    let mut time_last = Instant::now();
    let mut completed = 0;

    for run in 1..=budget {
        if stop.load(Ordering::SeqCst) {
            break;
        }

        lock.lock().await;

        if run == 1 {
            // Re-initialize timing info to account for the initial delay of
            // starting all nodes.
            *started.write().await = Instant::now();
            time_last = Instant::now();
        }

        let gap = time_last.elapsed();
        if tracker.record(gap) || run % HEARTBEAT_EVERY == 0 {
            print!(".");
            let _ = std::io::stdout().flush();
        }
        time_last = Instant::now();

        lock.unlock().await;
        completed = run;
    }

    tracing::debug!(
        "Worker on {} finished after {} of {} runs",
        lock.name(),
        completed,
        budget
    );

    let report = WorkerReport {
        iterations: completed,
        worst_delay: tracker.worst(),
    };

    if let Err(e) = reports.send(report).await {
        tracing::error!("Failed to report result for {}: {}", lock.name(), e);
    }
}
