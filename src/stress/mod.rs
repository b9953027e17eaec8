//! Stress Harness Module
//!
//! The load-generation half of the binary: a fixed pool of workers that
//! hammer acquire/release cycles on disjoint lock names, a cooperative
//! shutdown path triggered by the operator interrupt, and the one-shot
//! statistics aggregation printed at the end of a run.
//!
//! ## Core Mechanisms
//! - **Workers**: Each worker drives one named lock through up to a fixed
//!   budget of acquire/release cycles, recording the worst gap between
//!   consecutive acquisitions. Workers only share the stop flag and a common
//!   start timestamp; they never contend with each other on a lock name.
//! - **Cooperative Cancellation**: The stop flag is checked at iteration
//!   boundaries only. An iteration in flight always completes, so no lock is
//!   ever abandoned while held.
//! - **Aggregation**: After every worker reported, throughput and the
//!   cluster-wide worst-case delay are computed once over the full result
//!   set, never incrementally.

pub mod shutdown;
pub mod stats;
pub mod worker;

#[cfg(test)]
mod tests;

/// Number of concurrent workers in the reference configuration.
pub const PARALLEL: usize = 5;

/// Acquire/release cycles each worker attempts before stopping on its own.
pub const DEFAULT_RUNS: usize = 40_000;
