//! Lock Wire Protocol
//!
//! Defines the API endpoints and Data Transfer Objects (DTOs) used for the
//! peer-to-peer lock traffic (acquire, release, introspection).
//!
//! These structures are serialized as JSON and sent over HTTP between
//! instances. Every lock operation fans out to all roster peers, so the
//! schema is the compatibility contract of the whole cluster.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Endpoint for requesting ownership of a named lock.
pub const ENDPOINT_ACQUIRE: &str = "/acquire";
/// Endpoint for returning ownership of a named lock.
pub const ENDPOINT_RELEASE: &str = "/release";
/// Suffix of the companion introspection endpoint.
pub const STATUS_SUFFIX: &str = "-status";

/// Base path of the lock service for the given roster slot.
///
/// Paths carry the roster index so that multiple logical peers can be served
/// from one process in local test topologies without route collisions.
pub fn rpc_path(index: usize) -> String {
    format!("/dlock-{}", index)
}

/// Path of the introspection endpoint for the given roster slot.
pub fn status_path(index: usize) -> String {
    format!("{}{}", rpc_path(index), STATUS_SUFFIX)
}

// --- Data Transfer Objects ---

/// The ownership flavor being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockMode {
    /// Full write ownership; excludes every other holder.
    Exclusive,
    /// Read ownership; stacks with other shared holders.
    Shared,
}

/// Request for ownership of a named lock on one peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireRequest {
    /// The lock name (a cluster-wide resource key).
    pub name: String,
    /// Exclusive or shared ownership.
    pub mode: LockMode,
    /// Opaque identity of the requesting lock instance.
    pub requester: String,
}

/// Grant or denial of an acquire request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireResponse {
    /// Whether this peer granted the request.
    pub granted: bool,
    /// Generation token of the grant; must be presented on release.
    /// `None` when the request was denied.
    pub token: Option<u64>,
}

/// Request to return a previously granted lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// The lock name.
    pub name: String,
    /// The generation token received when the lock was granted.
    pub token: u64,
}

/// Acknowledgment of a release request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// `false` when the name was unknown or the token did not validate.
    pub released: bool,
}

/// Snapshot served by the introspection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Number of lock names currently held on this peer.
    pub held: usize,
    /// The held lock names.
    pub names: Vec<String>,
}
