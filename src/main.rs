use lock_chaos::cluster::roster::{self, NODES};
use lock_chaos::dlock::client::{DistributedRwLock, PeerClient};
use lock_chaos::dlock::handlers;
use lock_chaos::dlock::server::LockTable;
use lock_chaos::stress::shutdown::{self, DRAIN_GRACE};
use lock_chaos::stress::worker::WorkerReport;
use lock_chaos::stress::{DEFAULT_RUNS, PARALLEL, stats, worker};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut port: u16 = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--port" => {
                port = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if port == 0 {
        eprintln!("Usage: {} -p <port>", args[0]);
        eprintln!("The port must match exactly one entry of the cluster roster.");

        std::process::exit(1);
    }

    // 1. Peer clients (one per roster entry, index-disambiguated paths):
    let clients: Arc<Vec<PeerClient>> = Arc::new(
        NODES
            .iter()
            .enumerate()
            .map(|(index, addr)| PeerClient::new(addr, index))
            .collect(),
    );

    // 2. Self-identification:
    let self_index = match roster::find_self_index(&clients, port) {
        Some(index) => index,
        None => {
            eprintln!("Port {} does not match any roster entry", port);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Running as roster node {} ({})",
        self_index,
        clients[self_index].node()
    );

    // 3. Lock service endpoint:
    let table = LockTable::new();
    let listener = handlers::bind(port).await?;
    handlers::spawn_server(listener, handlers::lock_router(table, self_index));

    // 4. Shared run state:
    let stop = Arc::new(AtomicBool::new(false));
    let started = Arc::new(RwLock::new(Instant::now()));
    let (reports_tx, reports_rx) = mpsc::channel::<WorkerReport>(PARALLEL);

    shutdown::spawn_interrupt_listener(stop.clone());

    println!("Test starting...");

    // 5. Stress workers:
    let mut handles = Vec::with_capacity(PARALLEL);
    for nr in 0..PARALLEL {
        let lock = DistributedRwLock::new(format!("chaos-{}-{}", port, nr), clients.clone());

        handles.push(tokio::spawn(worker::lock_loop(
            lock,
            DEFAULT_RUNS,
            stop.clone(),
            started.clone(),
            reports_tx.clone(),
        )));
    }

    // The channel closes once every worker has sent its report.
    drop(reports_tx);

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!("Worker task failed: {}", e);
        }
    }

    if stop.load(Ordering::SeqCst) {
        tracing::info!("Run aborted by operator, reporting partial results");
    }

    // 6. Aggregate and report:
    let elapsed = started.read().await.elapsed();
    let report = stats::collect(reports_rx, elapsed, NODES.len()).await;
    report.print();

    // Let release messages get out to the peers before the endpoint dies
    // with the process.
    println!("Waiting for test to close...");
    tokio::time::sleep(DRAIN_GRACE).await;

    Ok(())
}
