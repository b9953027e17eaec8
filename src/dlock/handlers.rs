use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::protocol::{
    AcquireRequest, AcquireResponse, ENDPOINT_ACQUIRE, ENDPOINT_RELEASE, ReleaseRequest,
    ReleaseResponse, StatusResponse, rpc_path, status_path,
};
use super::server::LockTable;

pub async fn handle_acquire(
    Extension(table): Extension<Arc<LockTable>>,
    Json(req): Json<AcquireRequest>,
) -> (StatusCode, Json<AcquireResponse>) {
    match table.acquire(&req.name, req.mode, &req.requester).await {
        Some(token) => (
            StatusCode::OK,
            Json(AcquireResponse {
                granted: true,
                token: Some(token),
            }),
        ),
        None => (
            StatusCode::OK,
            Json(AcquireResponse {
                granted: false,
                token: None,
            }),
        ),
    }
}

pub async fn handle_release(
    Extension(table): Extension<Arc<LockTable>>,
    Json(req): Json<ReleaseRequest>,
) -> (StatusCode, Json<ReleaseResponse>) {
    let released = table.release(&req.name, req.token).await;
    (StatusCode::OK, Json(ReleaseResponse { released }))
}

pub async fn handle_status(
    Extension(table): Extension<Arc<LockTable>>,
) -> (StatusCode, Json<StatusResponse>) {
    let names = table.held_names().await;
    (
        StatusCode::OK,
        Json(StatusResponse {
            held: names.len(),
            names,
        }),
    )
}

/// Assembles the lock endpoint router for the given roster slot.
///
/// Acquire/release live under the index-disambiguated base path; the
/// introspection handler under the suffixed companion path.
pub fn lock_router(table: Arc<LockTable>, index: usize) -> Router {
    let base = rpc_path(index);

    Router::new()
        .route(&format!("{}{}", base, ENDPOINT_ACQUIRE), post(handle_acquire))
        .route(&format!("{}{}", base, ENDPOINT_RELEASE), post(handle_release))
        .route(&status_path(index), get(handle_status))
        .layer(Extension(table))
}

/// Binds the endpoint listener.
///
/// A port that cannot be bound means this instance cannot participate in the
/// cluster at all, so the error must be treated as fatal by the caller.
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind lock endpoint on port {}: {}", port, e))
}

/// Serves the endpoint for the lifetime of the process.
///
/// There is no shutdown path; process exit closes the listener.
pub fn spawn_server(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Lock endpoint server exited: {}", e);
        }
    });
}
