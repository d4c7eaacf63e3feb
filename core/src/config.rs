//! Client configuration and base-URL strategy.
//!
//! # Design
//! Configuration is an explicit value built once at startup and handed to
//! `PortalClient::new`; nothing is read from the environment at call time.
//! The runtime context is likewise passed in rather than sniffed, so the
//! proxy-vs-direct branch is a plain, exhaustive match.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ConfigError;

/// Same-origin mount point of the forwarding proxy.
pub const PROXY_BASE_PATH: &str = "/api/proxy";

/// Placeholder secret accepted only outside production.
pub const PLACEHOLDER_SECRET: &str = "default-secret-key";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Where the client is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeContext {
    pub is_browser: bool,
    pub is_production: bool,
}

impl RuntimeContext {
    pub fn server() -> Self {
        Self::default()
    }

    pub fn production_browser() -> Self {
        Self {
            is_browser: true,
            is_production: true,
        }
    }
}

#[derive(Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `https://api.example.org`.
    pub api_origin: String,
    pub secret_key: String,
    /// Default request deadline.
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_origin", &self.api_origin)
            .field("secret_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_origin: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_origin: api_origin.into(),
            secret_key: secret_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from `PORTAL_API_URL`, `PORTAL_SECRET_KEY` and `PORTAL_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_origin = lookup("PORTAL_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("PORTAL_API_URL"))?;

        let secret_key = lookup("PORTAL_SECRET_KEY").unwrap_or_else(|| {
            warn!("PORTAL_SECRET_KEY not set, using placeholder secret");
            PLACEHOLDER_SECRET.to_string()
        });

        let timeout = match lookup("PORTAL_TIMEOUT_MS") {
            Some(raw) => parse_timeout("PORTAL_TIMEOUT_MS", &raw)?,
            None => {
                info!("PORTAL_TIMEOUT_MS not set, using default: {}", DEFAULT_TIMEOUT.as_millis());
                DEFAULT_TIMEOUT
            }
        };

        Ok(Self {
            api_origin,
            secret_key,
            timeout,
        })
    }

    /// Reject settings that are unsafe for `ctx`.
    pub fn validate(&self, ctx: RuntimeContext) -> Result<(), ConfigError> {
        if ctx.is_production && self.secret_key == PLACEHOLDER_SECRET {
            return Err(ConfigError::PlaceholderSecret);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "PORTAL_TIMEOUT_MS",
                reason: "timeout cannot be 0".into(),
            });
        }
        Ok(())
    }

    /// Base URL for `ctx`: the same-origin proxy for production browsers,
    /// the backend origin everywhere else.
    pub fn resolve_base_url(&self, ctx: RuntimeContext) -> String {
        match (ctx.is_browser, ctx.is_production) {
            (true, true) => PROXY_BASE_PATH.to_string(),
            (true, false) | (false, true) | (false, false) => {
                self.api_origin.trim_end_matches('/').to_string()
            }
        }
    }
}

/// Parse a positive millisecond count.
pub fn parse_timeout(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let ms: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })?;
    if ms == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "timeout cannot be 0".into(),
        });
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn production_browser_uses_proxy() {
        let cfg = ClientConfig::new("https://api.example.org/", "s");
        assert_eq!(cfg.resolve_base_url(RuntimeContext::production_browser()), "/api/proxy");
    }

    #[test]
    fn every_other_context_goes_direct() {
        let cfg = ClientConfig::new("https://api.example.org/", "s");
        for (is_browser, is_production) in [(true, false), (false, true), (false, false)] {
            let ctx = RuntimeContext { is_browser, is_production };
            assert_eq!(cfg.resolve_base_url(ctx), "https://api.example.org");
        }
    }

    #[test]
    fn loads_all_keys() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("PORTAL_API_URL", "http://localhost:8080"),
            ("PORTAL_SECRET_KEY", "s3cret"),
            ("PORTAL_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_origin, "http://localhost:8080");
        assert_eq!(cfg.secret_key, "s3cret");
        assert_eq!(cfg.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn defaults_apply() {
        let cfg = ClientConfig::from_lookup(lookup(&[("PORTAL_API_URL", "http://x")])).unwrap();
        assert_eq!(cfg.secret_key, PLACEHOLDER_SECRET);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn origin_is_required() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("PORTAL_API_URL")));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        for raw in ["abc", "0", "-5"] {
            let err = ClientConfig::from_lookup(lookup(&[
                ("PORTAL_API_URL", "http://x"),
                ("PORTAL_TIMEOUT_MS", raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{raw}");
        }
    }

    #[test]
    fn placeholder_secret_rejected_in_production_only() {
        let cfg = ClientConfig::new("http://x", PLACEHOLDER_SECRET);
        assert!(cfg.validate(RuntimeContext::server()).is_ok());
        let prod = RuntimeContext {
            is_browser: false,
            is_production: true,
        };
        assert!(matches!(cfg.validate(prod), Err(ConfigError::PlaceholderSecret)));
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = ClientConfig::new("http://x", "hunter2");
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
