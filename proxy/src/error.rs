use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body message of every forwarding failure ("proxy request failed").
pub const PROXY_FAILURE_MSG: &str = "代理请求失败";

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned a non-JSON body: {0}")]
    MalformedUpstream(#[from] serde_json::Error),

    #[error("could not read request body: {0}")]
    RequestBody(String),
}

/// Internal detail is logged, never sent: the browser only ever sees the
/// fixed envelope.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "proxy error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"code": 500, "msg": PROXY_FAILURE_MSG})),
        )
            .into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
