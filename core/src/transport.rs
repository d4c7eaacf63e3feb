//! Async execution of signed requests over reqwest.
//!
//! # Design
//! `ApiClient` pairs a `PortalClient` (request building, envelope parsing)
//! with a pooled `reqwest::Client`. Each call fails exactly once: there is
//! no retry or backoff. A `CancelToken` is threaded through every call;
//! cancelling drops the in-flight reqwest future, which aborts the
//! underlying connection attempt or read.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::debug;

use crate::client::PortalClient;
use crate::config::{ClientConfig, RuntimeContext};
use crate::envelope::Envelope;
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Cooperative cancellation shared between a caller and its requests.
///
/// Clones observe the same state; cancelling is permanent.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so `wait_for` cannot observe a close.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Executes `PortalClient` requests.
///
/// Requests are sent from this process, so the base URL must be absolute.
/// The production-browser context resolves to the relative `/api/proxy`
/// and only suits `PortalClient` requests that a browser host executes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    portal: PortalClient,
    http: reqwest::Client,
}

impl ApiClient {
    /// Fails when `config` is unsafe for `ctx` (see `ClientConfig::validate`).
    pub fn new(config: ClientConfig, ctx: RuntimeContext) -> Result<Self, ConfigError> {
        let portal = PortalClient::try_new(config, ctx)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self::with_http_client(portal, http))
    }

    pub fn with_http_client(portal: PortalClient, http: reqwest::Client) -> Self {
        Self { portal, http }
    }

    /// The request builder; use its `build_*` methods to produce requests.
    pub fn portal(&self) -> &PortalClient {
        &self.portal
    }

    /// Execute `request` and unwrap its envelope.
    pub async fn call<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        cancel: &CancelToken,
    ) -> Result<Envelope<T>, ApiError> {
        let response = self.send(request, cancel).await?;
        self.portal.parse(response)
    }

    /// Execute `request` and return the raw response, whatever its status.
    pub async fn send(&self, request: HttpRequest, cancel: &CancelToken) -> Result<HttpResponse, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let timeout = request.timeout.unwrap_or(self.portal.default_timeout());
        debug!(method = %request.method, url = %request.path, ?timeout, "sending request");

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &request.path)
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let exchange = async {
            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            let body = response.text().await.map_err(map_reqwest_error)?;
            Ok(HttpResponse { status, headers, body })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %request.path, "request cancelled");
                Err(ApiError::Cancelled)
            }
            result = exchange => result,
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::transport(e.to_string())
    }
}
