use crate::dlock::client::PeerClient;

/// The cluster roster: one `host:port` entry per peer.
///
/// Must be identical, in the same order, on every running instance. The
/// position of an entry is that peer's stable identity; the lock endpoint
/// paths are derived from it.
pub const NODES: &[&str] = &[
    "127.0.0.1:12345",
    "127.0.0.1:12346",
    "127.0.0.1:12347",
    "127.0.0.1:12348",
    "127.0.0.1:12349",
    "127.0.0.1:12350",
    "127.0.0.1:12351",
    "127.0.0.1:12352",
];

/// Resolves which roster slot this process occupies.
///
/// Scans the initialized peer clients (one per roster entry, same order) and
/// compares the port portion of each peer address with the port this process
/// listens on. Exactly one entry is expected to match.
///
/// Returns `None` when no entry matches; the caller must treat that as a
/// configuration error, since an instance without an identity cannot
/// participate in the locking protocol.
///
/// # Panics
/// Panics when two or more entries match. A roster with duplicate ports makes
/// the instance identity ambiguous and everything built on top of it
/// undefined, so the process must not continue.
pub fn find_self_index(clients: &[PeerClient], listen_port: u16) -> Option<usize> {
    let mut index = None;

    for (i, client) in clients.iter().enumerate() {
        if client.port() == Some(listen_port) {
            if index.is_none() {
                index = Some(i);
            } else {
                panic!(
                    "more than one roster entry listens on port {}",
                    listen_port
                );
            }
        }
    }

    index
}
