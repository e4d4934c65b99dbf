use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::header::HOST;
use axum::http::{HeaderMap, Uri};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tracing::info;

use phonebook_core::PhoneStore;

use crate::handlers::{Reply, RequestInfo, dispatch};

/// Build the HTTP router. Every method and path goes through [`dispatch`].
pub fn router(store: Arc<dyn PhoneStore>) -> Router {
    Router::new().fallback(handle).with_state(store)
}

async fn handle(
    State(store): State<Arc<dyn PhoneStore>>,
    headers: HeaderMap,
    uri: Uri,
) -> Reply {
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string();
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    let req = RequestInfo::new(path, host);
    dispatch(store.as_ref(), &req).await
}

/// Serve until ctrl-c is received.
pub async fn serve(listener: TcpListener, store: Arc<dyn PhoneStore>) -> Result<()> {
    serve_with_shutdown(listener, store, shutdown_signal()).await
}

pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    store: Arc<dyn PhoneStore>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    info!(%addr, "Listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
