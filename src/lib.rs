//! Distributed Lock Chaos Harness Library
//!
//! This library crate defines the core modules of the harness. It serves as the
//! foundation for the binary executable (`main.rs`), which wires a single
//! cluster instance together and drives the stress run.
//!
//! ## Architecture Modules
//! The harness is composed of three loosely coupled subsystems:
//!
//! - **`cluster`**: The static peer roster shared by every instance, and the
//!   self-identification logic that resolves which roster slot the running
//!   process occupies.
//! - **`dlock`**: The distributed read-write lock backend as seen from this
//!   harness: the client-side named mutex (`DistributedRwLock`) that fans
//!   acquire/release requests out to every peer, and the server-side HTTP
//!   endpoint each instance exposes so peers can reach its slice of the
//!   lock state.
//! - **`stress`**: The load-generation layer: a pool of concurrent workers
//!   hammering acquire/release cycles, the cooperative shutdown coordinator,
//!   and the statistics aggregation that produces the final report.

pub mod cluster;
pub mod dlock;
pub mod stress;
