//! Lock Endpoint State
//!
//! The `LockTable` is the only mutable state behind an instance's lock
//! endpoint: a map from lock name to its current grant state. A single
//! mutex serializes every request against it, which keeps the grant and
//! release transitions trivially atomic.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::protocol::LockMode;

/// Grant state of one named lock on this peer.
#[derive(Debug)]
enum LockState {
    /// Held by a single writer.
    Exclusive { token: u64, requester: String },
    /// Held by one or more readers; `(token, requester)` per holder.
    Shared { holders: Vec<(u64, String)> },
}

struct LockTableInner {
    map: HashMap<String, LockState>,
    /// Source of grant generation tokens; strictly increasing.
    next_token: u64,
}

/// Per-instance lock state, shared by all endpoint handlers.
pub struct LockTable {
    /// Request-serialization lock: every handler takes it for the whole
    /// duration of its state transition.
    inner: Mutex<LockTableInner>,
}

impl LockTable {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(LockTableInner {
                map: HashMap::new(),
                next_token: 1,
            }),
        })
    }

    /// Attempts to grant the named lock in the requested mode.
    ///
    /// Exclusive requests are granted only when the name is free. Shared
    /// requests stack on top of other shared holders but are denied while a
    /// writer holds the name. Returns the generation token of the grant, or
    /// `None` on denial.
    pub async fn acquire(&self, name: &str, mode: LockMode, requester: &str) -> Option<u64> {
        let mut inner = self.inner.lock().await;
        let token = inner.next_token;

        match inner.map.entry(name.to_string()) {
            Entry::Occupied(mut entry) => match (entry.get_mut(), mode) {
                (LockState::Shared { holders }, LockMode::Shared) => {
                    holders.push((token, requester.to_string()));
                }
                (LockState::Exclusive { requester: holder, .. }, _) => {
                    tracing::debug!(
                        "Denied {:?} on {} for {} (writer {} holds it)",
                        mode,
                        name,
                        requester,
                        holder
                    );
                    return None;
                }
                (LockState::Shared { .. }, LockMode::Exclusive) => {
                    tracing::debug!("Denied {:?} on {} for {} (read-held)", mode, name, requester);
                    return None;
                }
            },
            Entry::Vacant(entry) => {
                let state = match mode {
                    LockMode::Exclusive => LockState::Exclusive {
                        token,
                        requester: requester.to_string(),
                    },
                    LockMode::Shared => LockState::Shared {
                        holders: vec![(token, requester.to_string())],
                    },
                };
                entry.insert(state);
            }
        }

        inner.next_token += 1;
        tracing::debug!(
            "Granted {:?} on {} to {} (token {})",
            mode,
            name,
            requester,
            token
        );

        Some(token)
    }

    /// Returns a previously granted lock.
    ///
    /// The presented token must match one handed out by `acquire`; anything
    /// else is a stale or foreign release and is rejected.
    pub async fn release(&self, name: &str, token: u64) -> bool {
        let mut inner = self.inner.lock().await;

        let released;
        let mut remove_entry = false;

        match inner.map.get_mut(name) {
            Some(LockState::Exclusive { token: held, .. }) => {
                released = *held == token;
                remove_entry = released;
            }
            Some(LockState::Shared { holders }) => {
                let before = holders.len();
                holders.retain(|(held, _)| *held != token);
                released = holders.len() < before;
                remove_entry = holders.is_empty();
            }
            None => {
                released = false;
            }
        }

        if remove_entry {
            inner.map.remove(name);
        }

        if !released {
            tracing::warn!("Rejected release of {} with token {}", name, token);
        }

        released
    }

    /// Names currently held on this peer, for the introspection endpoint.
    pub async fn held_names(&self) -> Vec<String> {
        let inner = self.inner.lock().await;
        inner.map.keys().cloned().collect()
    }
}
