//! Same-origin forwarding proxy for the portal API.
//!
//! # Overview
//! Browser code in production calls `/api/proxy/{*path}` on its own origin;
//! this server replays the call against the real backend and relays the
//! answer. The backend's location never reaches the browser and the backend
//! needs no CORS setup.
//!
//! # Design
//! - Method, path, query string, headers (minus hop-by-hop) and body are
//!   forwarded verbatim, so the client's `X-Sign` headers still validate.
//!   HEAD goes upstream as GET.
//! - The upstream JSON body is re-emitted with the upstream status code.
//! - Any failure becomes HTTP 500 `{"code":500,"msg":"代理请求失败"}`.
//! - No state is kept between requests beyond reqwest's connection pool.

pub mod config;
pub mod error;
pub mod headers;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::debug;

pub use config::ProxyConfig;
pub use error::{ProxyError, PROXY_FAILURE_MSG};

/// Mount point; everything after it is the backend path.
pub const PROXY_PREFIX: &str = "/api/proxy/";

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct ProxyState {
    config: Arc<ProxyConfig>,
    http: reqwest::Client,
}

pub fn app(config: ProxyConfig) -> Result<Router, ProxyError> {
    let http = reqwest::Client::builder().timeout(config.timeout).build()?;
    let state = ProxyState {
        config: Arc::new(config),
        http,
    };
    Ok(Router::new()
        .route(
            "/api/proxy/{*path}",
            get(forward).post(forward).put(forward).delete(forward),
        )
        .with_state(state))
}

pub async fn run(listener: TcpListener, config: ProxyConfig) -> Result<(), std::io::Error> {
    let app = app(config).map_err(std::io::Error::other)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// `{upstream}/{path}`, plus `?{query}` only when there is a query.
pub fn target_url(upstream: &str, path: &str, query: Option<&str>) -> String {
    let upstream = upstream.trim_end_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{upstream}/{path}?{q}"),
        None => format!("{upstream}/{path}"),
    }
}

async fn forward(State(state): State<ProxyState>, request: Request) -> Result<Response, ProxyError> {
    // axum routes HEAD to the GET handler; upstream sees the GET it stands for.
    let method = if *request.method() == Method::HEAD {
        Method::GET
    } else {
        request.method().clone()
    };
    let path = request
        .uri()
        .path()
        .strip_prefix(PROXY_PREFIX)
        .unwrap_or_default()
        .to_string();
    let url = target_url(&state.config.upstream, &path, request.uri().query());
    let headers = headers::forwardable(request.headers(), &state.config.strip_headers);

    debug!(%method, %url, "forwarding request");

    let mut outbound = state.http.request(method.clone(), &url).headers(headers);
    if method != Method::GET {
        let body = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| ProxyError::RequestBody(e.to_string()))?;
        if !body.is_empty() {
            outbound = outbound.body(body);
        }
    }

    let upstream = outbound.send().await?;
    let status = upstream.status();
    let bytes = upstream.bytes().await?;
    let data: Value = serde_json::from_slice(&bytes)?;

    debug!(%url, status = status.as_u16(), "relaying response");
    Ok((status, Json(data)).into_response())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("failed to install terminate handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
