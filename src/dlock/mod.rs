//! Distributed Lock Backend Module
//!
//! Implements both surfaces of the read-write lock backend as this harness
//! uses them: the client-side named mutex and the server-side endpoint every
//! instance runs so peers can reach its slice of the lock state. The protocol
//! is peer-to-peer and symmetric; there is no coordinator node.
//!
//! ## Core Mechanisms
//! - **Acquisition**: `DistributedRwLock` fans an acquire request out to every
//!   roster peer and only considers the lock held once all of them granted it.
//!   Denied rounds release any partial grants and retry with jitter, so an
//!   acquisition is a blocking call that eventually succeeds.
//! - **Grant Tokens**: Each grant carries a generation token the holder must
//!   present on release, letting the endpoint reject stale or foreign
//!   releases.
//! - **Per-Instance Paths**: Endpoint routes are disambiguated by roster
//!   index, so several logical peers can share one process in test
//!   topologies.
//!
//! ## Submodules
//! - **`protocol`**: HTTP API contracts (paths and DTOs) for the lock wire
//!   protocol.
//! - **`server`**: The `LockTable` state machine behind the endpoint.
//! - **`handlers`**: axum handlers, router assembly, and listener setup.
//! - **`client`**: `PeerClient` (per-peer HTTP client) and
//!   `DistributedRwLock` (the named lock primitive workers drive).

pub mod client;
pub mod handlers;
pub mod protocol;
pub mod server;
