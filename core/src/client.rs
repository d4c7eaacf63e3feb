//! Stateless signed-request builder and envelope parser for the portal API.
//!
//! # Design
//! `PortalClient` holds the resolved base URL, the signer and the default
//! deadline; it carries no mutable state between calls. Every request it
//! builds gets fresh `X-Timestamp`/`X-Nonce`/`X-Sign` headers, GET included.
//! Endpoint-specific `build_*` methods live in `crate::api`; responses of
//! every endpoint go through the one generic `parse`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::{ClientConfig, RuntimeContext};
use crate::envelope::{unwrap_envelope, Envelope};
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::signer::Signer;

/// Session header attached to calls made on behalf of a logged-in user.
pub const TOKEN_HEADER: &str = "Whitelist-Token";

/// Synchronous, stateless client for the portal API.
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: String,
    signer: Signer,
    timeout: std::time::Duration,
}

impl PortalClient {
    /// Resolve the base URL for `ctx` once and keep it for the client's life.
    ///
    /// Does not check `config`; see `try_new`.
    pub fn new(config: ClientConfig, ctx: RuntimeContext) -> Self {
        let base_url = config.resolve_base_url(ctx);
        debug!(%base_url, ?ctx, "portal client configured");
        Self {
            base_url,
            signer: Signer::new(config.secret_key),
            timeout: config.timeout,
        }
    }

    /// Like `new`, but refuses configs `ClientConfig::validate` rejects for
    /// `ctx`, such as the placeholder secret in production.
    pub fn try_new(config: ClientConfig, ctx: RuntimeContext) -> Result<Self, ConfigError> {
        config.validate(ctx)?;
        Ok(Self::new(config, ctx))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_timeout(&self) -> std::time::Duration {
        self.timeout
    }

    /// Build a signed request without a body.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> HttpRequest {
        let mut headers = self.signer.sign().to_pairs();
        if let Some(token) = token {
            headers.push((TOKEN_HEADER.to_string(), token.to_string()));
        }
        HttpRequest {
            method,
            path: self.url(endpoint, query),
            headers,
            body: None,
            timeout: None,
        }
    }

    /// Build a signed request with a JSON body.
    pub fn request_json<B: Serialize>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: &[(&str, &str)],
        body: &B,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let mut req = self.request(method, endpoint, query, token);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }

    /// Unwrap the envelope of any endpoint's response.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Envelope<T>, ApiError> {
        unwrap_envelope(&response).inspect_err(|e| match e {
            ApiError::Application { code, msg } => warn!(code, %msg, "request rejected"),
            other => warn!(error = %other, status = response.status, "request failed"),
        })
    }

    fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        let base = format!("{}/{endpoint}", self.base_url);
        if query.is_empty() {
            return base;
        }
        let mut qs = form_urlencoded::Serializer::new(String::new());
        for (k, v) in query {
            qs.append_pair(k, v);
        }
        format!("{base}?{}", qs.finish())
    }
}

/// Percent-encode a single path segment.
pub fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
