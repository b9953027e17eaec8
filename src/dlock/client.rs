use anyhow::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use super::protocol::{
    AcquireRequest, AcquireResponse, ENDPOINT_ACQUIRE, ENDPOINT_RELEASE, LockMode, ReleaseRequest,
    ReleaseResponse, rpc_path,
};

/// Base pause between failed acquisition rounds; the actual pause adds up to
/// the same amount again as jitter so peers competing for one name do not
/// retry in lockstep.
const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// HTTP client for one roster peer's lock endpoint.
pub struct PeerClient {
    /// The raw `host:port` roster entry.
    addr: String,
    /// Base URL including the peer's index-disambiguated path.
    base_url: String,
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new(addr: &str, index: usize) -> Self {
        Self {
            addr: addr.to_string(),
            base_url: format!("http://{}{}", addr, rpc_path(index)),
            http: reqwest::Client::new(),
        }
    }

    /// The `host:port` this client points at.
    pub fn node(&self) -> &str {
        &self.addr
    }

    /// Port portion of the peer address, if parseable.
    pub fn port(&self) -> Option<u16> {
        self.addr.rsplit(':').next()?.parse().ok()
    }

    pub async fn acquire(&self, req: &AcquireRequest) -> Result<AcquireResponse> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_ACQUIRE))
            .json(req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("acquire rejected: {}", response.status()));
        }

        Ok(response.json().await?)
    }

    pub async fn release(&self, req: &ReleaseRequest) -> Result<ReleaseResponse> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, ENDPOINT_RELEASE))
            .json(req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("release rejected: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}

/// A named read-write mutex whose ownership is coordinated across the whole
/// cluster.
///
/// Acquisition fans out to every roster peer and succeeds only once all of
/// them granted; a denied round releases the partial grants and retries after
/// a jittered pause. The calls block until they succeed and apply no
/// per-request timeout: a wedged peer stalls the caller, which is exactly the
/// kind of condition this harness exists to surface.
pub struct DistributedRwLock {
    name: String,
    /// Identity presented to peers on every acquire.
    requester: String,
    clients: Arc<Vec<PeerClient>>,
    /// Grant token per peer while the lock is held.
    held: Vec<Option<u64>>,
}

impl DistributedRwLock {
    pub fn new(name: impl Into<String>, clients: Arc<Vec<PeerClient>>) -> Self {
        let held = vec![None; clients.len()];

        Self {
            name: name.into(),
            requester: uuid::Uuid::new_v4().to_string(),
            clients,
            held,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquires full write ownership of the named lock across every peer.
    pub async fn lock(&mut self) {
        self.acquire_all(LockMode::Exclusive).await;
    }

    /// Releases write ownership.
    pub async fn unlock(&mut self) {
        self.release_all().await;
    }

    /// Acquires shared read ownership of the named lock across every peer.
    pub async fn rlock(&mut self) {
        self.acquire_all(LockMode::Shared).await;
    }

    /// Releases shared read ownership.
    pub async fn runlock(&mut self) {
        self.release_all().await;
    }

    async fn acquire_all(&mut self, mode: LockMode) {
        let req = AcquireRequest {
            name: self.name.clone(),
            mode,
            requester: self.requester.clone(),
        };

        loop {
            let mut all_granted = true;

            for (i, client) in self.clients.iter().enumerate() {
                match client.acquire(&req).await {
                    Ok(response) if response.granted => {
                        self.held[i] = response.token;
                    }
                    Ok(_) => {
                        all_granted = false;
                        break;
                    }
                    Err(e) => {
                        // Transport failures count as denials; the backend
                        // contract is to block until the cluster lets us in.
                        tracing::debug!("Acquire on {} failed: {}", client.node(), e);
                        all_granted = false;
                        break;
                    }
                }
            }

            if all_granted {
                return;
            }

            self.release_all().await;

            let jitter = rand::thread_rng().gen_range(0..RETRY_INTERVAL.as_millis() as u64);
            tokio::time::sleep(RETRY_INTERVAL + Duration::from_millis(jitter)).await;
        }
    }

    async fn release_all(&mut self) {
        for (i, client) in self.clients.iter().enumerate() {
            if let Some(token) = self.held[i].take() {
                let req = ReleaseRequest {
                    name: self.name.clone(),
                    token,
                };

                match client.release(&req).await {
                    Ok(response) if response.released => {}
                    Ok(_) => {
                        tracing::warn!("Peer {} rejected release of {}", client.node(), self.name);
                    }
                    Err(e) => {
                        tracing::warn!("Release on {} failed: {}", client.node(), e);
                    }
                }
            }
        }
    }
}
