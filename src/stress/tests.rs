//! Stress Harness Tests
//!
//! Validates the measurement primitives, the aggregation math, and the full
//! worker pipeline against a live colocated cluster.
//!
//! ## Test Scopes
//! - **Delay Tracking**: The worst-case delay is a true running maximum.
//! - **Aggregation**: Throughput and message-rate math, one-shot channel
//!   drain.
//! - **End-to-End**: Multi-peer roster on ephemeral ports, a worker pool
//!   running to budget exhaustion and under cooperative abort.

#[cfg(test)]
mod tests {
    use crate::dlock::client::{DistributedRwLock, PeerClient};
    use crate::dlock::handlers;
    use crate::dlock::server::LockTable;
    use crate::stress::stats::{self, StressReport};
    use crate::stress::worker::{self, DelayTracker, WorkerReport};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};
    use tokio::sync::{RwLock, mpsc};

    /// Spawns `n` colocated lock endpoints on ephemeral ports and returns the
    /// matching peer clients plus each endpoint's table for inspection.
    async fn spawn_cluster(n: usize) -> (Arc<Vec<PeerClient>>, Vec<Arc<LockTable>>) {
        let mut clients = Vec::with_capacity(n);
        let mut tables = Vec::with_capacity(n);

        for index in 0..n {
            let table = LockTable::new();

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind test listener");
            let addr = listener.local_addr().expect("Listener has no local addr");

            handlers::spawn_server(listener, handlers::lock_router(table.clone(), index));

            clients.push(PeerClient::new(&format!("127.0.0.1:{}", addr.port()), index));
            tables.push(table);
        }

        (Arc::new(clients), tables)
    }

    // ============================================================
    // DELAY TRACKER TESTS
    // ============================================================

    #[test]
    fn test_delay_tracker_is_monotonic_maximum() {
        let mut tracker = DelayTracker::new();

        let gaps = [
            Duration::from_millis(5),
            Duration::from_millis(2),
            Duration::from_millis(40),
            Duration::from_millis(40),
            Duration::from_millis(13),
        ];

        let mut previous = Duration::ZERO;
        for gap in gaps {
            tracker.record(gap);
            assert!(tracker.worst() >= previous, "worst must never decrease");
            previous = tracker.worst();
        }

        assert_eq!(tracker.worst(), Duration::from_millis(40));
    }

    #[test]
    fn test_delay_tracker_reports_new_maxima() {
        let mut tracker = DelayTracker::new();

        assert!(tracker.record(Duration::from_millis(10)));
        assert!(!tracker.record(Duration::from_millis(10)), "ties are not new maxima");
        assert!(!tracker.record(Duration::from_millis(3)));
        assert!(tracker.record(Duration::from_millis(11)));
    }

    // ============================================================
    // AGGREGATION TESTS
    // ============================================================

    #[test]
    fn test_report_throughput_math() {
        let report = StressReport {
            total_iterations: 200,
            elapsed: Duration::from_secs(4),
            worst_delay: Duration::from_millis(120),
            roster_size: 3,
        };

        assert!((report.locks_per_sec() - 50.0).abs() < 1e-9);
        // roster size x 2 messages per cycle x locks/sec
        assert!((report.msgs_per_sec() - 300.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_collect_drains_channel_once() {
        let (tx, rx) = mpsc::channel::<WorkerReport>(2);

        tx.send(WorkerReport {
            iterations: 80,
            worst_delay: Duration::from_millis(7),
        })
        .await
        .unwrap();
        tx.send(WorkerReport {
            iterations: 100,
            worst_delay: Duration::from_millis(31),
        })
        .await
        .unwrap();
        drop(tx);

        let report = stats::collect(rx, Duration::from_secs(2), 8).await;

        assert_eq!(report.total_iterations, 180);
        assert_eq!(report.worst_delay, Duration::from_millis(31));
        assert_eq!(report.roster_size, 8);
    }

    // ============================================================
    // END-TO-END TESTS
    // ============================================================

    #[tokio::test]
    async fn test_full_budget_run_reports_every_worker() {
        let (clients, tables) = spawn_cluster(3).await;

        let parallel = 2;
        let budget = 100;

        let stop = Arc::new(AtomicBool::new(false));
        let started = Arc::new(RwLock::new(Instant::now()));
        let (tx, mut rx) = mpsc::channel::<WorkerReport>(parallel);

        let mut handles = Vec::new();
        for nr in 0..parallel {
            let lock = DistributedRwLock::new(format!("stress-{}", nr), clients.clone());
            handles.push(tokio::spawn(worker::lock_loop(
                lock,
                budget,
                stop.clone(),
                started.clone(),
                tx.clone(),
            )));
        }
        drop(tx);

        for handle in handles {
            handle.await.expect("Worker task failed");
        }

        // Exactly one report per worker, each with the full budget.
        let mut received = Vec::new();
        while let Some(report) = rx.recv().await {
            received.push(report);
        }

        assert_eq!(received.len(), parallel);
        for report in &received {
            assert_eq!(report.iterations, budget);
        }

        // Every lock was released on the way out.
        for table in &tables {
            assert!(table.held_names().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_aggregated_report_from_live_run() {
        let (clients, _tables) = spawn_cluster(3).await;

        let parallel = 2;
        let budget = 100;

        let stop = Arc::new(AtomicBool::new(false));
        let started = Arc::new(RwLock::new(Instant::now()));
        let (tx, rx) = mpsc::channel::<WorkerReport>(parallel);

        let mut handles = Vec::new();
        for nr in 0..parallel {
            let lock = DistributedRwLock::new(format!("agg-{}", nr), clients.clone());
            handles.push(tokio::spawn(worker::lock_loop(
                lock,
                budget,
                stop.clone(),
                started.clone(),
                tx.clone(),
            )));
        }
        drop(tx);

        for handle in handles {
            handle.await.expect("Worker task failed");
        }

        let elapsed = started.read().await.elapsed();
        let report = stats::collect(rx, elapsed, 3).await;

        assert_eq!(report.total_iterations, parallel * budget);
        assert!(report.locks_per_sec() > 0.0);
        assert!(report.worst_delay >= Duration::ZERO);
    }

    #[tokio::test]
    async fn test_cooperative_stop_cuts_runs_short() {
        let (clients, tables) = spawn_cluster(3).await;

        let parallel = 2;
        let budget = 100_000;

        let stop = Arc::new(AtomicBool::new(false));
        let started = Arc::new(RwLock::new(Instant::now()));
        let (tx, mut rx) = mpsc::channel::<WorkerReport>(parallel);

        let mut handles = Vec::new();
        for nr in 0..parallel {
            let lock = DistributedRwLock::new(format!("abort-{}", nr), clients.clone());
            handles.push(tokio::spawn(worker::lock_loop(
                lock,
                budget,
                stop.clone(),
                started.clone(),
                tx.clone(),
            )));
        }
        drop(tx);

        // Let the pool make some progress, then flip the flag the way the
        // interrupt listener would.
        tokio::time::sleep(Duration::from_millis(300)).await;
        stop.store(true, Ordering::SeqCst);

        for handle in handles {
            handle.await.expect("Worker task failed");
        }

        let mut received = Vec::new();
        while let Some(report) = rx.recv().await {
            received.push(report);
        }

        assert_eq!(received.len(), parallel, "every worker reports, even aborted ones");
        for report in &received {
            assert!(report.iterations > 0, "workers should have made progress");
            assert!(
                report.iterations < budget,
                "the stop flag must cut the budget short"
            );
        }

        // No worker was interrupted while holding a lock.
        for table in &tables {
            assert!(table.held_names().await.is_empty());
        }
    }
}
