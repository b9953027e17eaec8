//! Statistics Aggregation
//!
//! Consumes the per-worker results exactly once, after every worker has
//! reported, and turns them into the final throughput and worst-case-delay
//! report. There is no partial or incremental aggregation.

use std::time::Duration;
use tokio::sync::mpsc;

use super::worker::WorkerReport;

/// Aggregate outcome of one harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct StressReport {
    /// Acquire/release cycles completed across all workers.
    pub total_iterations: usize,
    /// Wall time since the normalized start timestamp.
    pub elapsed: Duration,
    /// Largest inter-acquisition gap any worker observed.
    pub worst_delay: Duration,
    /// Number of cluster peers, for the message-rate estimate.
    pub roster_size: usize,
}

impl StressReport {
    /// Completed lock cycles per wall-clock second.
    pub fn locks_per_sec(&self) -> f64 {
        self.total_iterations as f64 / self.elapsed.as_secs_f64()
    }

    /// Estimated peer messages per second.
    ///
    /// Every lock cycle fans roughly two messages (acquire and release) out
    /// to each roster peer.
    pub fn msgs_per_sec(&self) -> f64 {
        self.roster_size as f64 * 2.0 * self.locks_per_sec()
    }

    /// Prints the final console report.
    pub fn print(&self) {
        println!();
        println!("        Locks/sec: {:7.0}", self.locks_per_sec());
        println!("         Msgs/sec: {:7.0}", self.msgs_per_sec());
        println!(" Worst case delay: {:5.3} s", self.worst_delay.as_secs_f64());
    }
}

/// Drains the closed result channel and folds it into a `StressReport`.
///
/// Must be called only after every worker has reported and the sending side
/// has been dropped; each value is consumed exactly once.
pub async fn collect(
    mut reports: mpsc::Receiver<WorkerReport>,
    elapsed: Duration,
    roster_size: usize,
) -> StressReport {
    let mut total_iterations = 0;
    let mut worst_delay = Duration::ZERO;

    while let Some(report) = reports.recv().await {
        total_iterations += report.iterations;
        if report.worst_delay > worst_delay {
            worst_delay = report.worst_delay;
        }
    }

    StressReport {
        total_iterations,
        elapsed,
        worst_delay,
        roster_size,
    }
}
