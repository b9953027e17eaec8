//! Shutdown Coordination
//!
//! Translates the operator interrupt into a cooperative stop signal. The
//! shared flag is written at most once and never reset; workers poll it at
//! iteration boundaries and drain on their own schedule.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Fixed post-run pause letting final release messages reach every peer
/// before the process exits. Deliberately a constant, not derived from
/// network conditions.
pub const DRAIN_GRACE: Duration = Duration::from_secs(10);

/// Registers the interrupt handler and runs it for the process lifetime.
///
/// On receipt the handler prints an acknowledgement and flips the shared stop
/// flag; it never terminates workers directly.
pub fn spawn_interrupt_listener(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                println!("\nCtrl-C intercepted");
                stop.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                tracing::error!("Failed to listen for interrupt: {}", e);
            }
        }
    });
}
