use std::{env, time::Duration};

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::headers::{default_rules, parse_rules, HeaderRule};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Backend origin requests are forwarded to.
    pub upstream: String,
    pub port: u16,
    pub timeout: Duration,
    pub strip_headers: Vec<HeaderRule>,
}

impl ProxyConfig {
    pub fn new(upstream: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into().trim_end_matches('/').to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            strip_headers: default_rules(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream = lookup("PROXY_UPSTREAM_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("PROXY_UPSTREAM_URL"))?;
        let mut config = Self::new(upstream);

        match lookup("PROXY_PORT") {
            Some(raw) => {
                config.port = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                    key: "PROXY_PORT",
                    reason: e.to_string(),
                })?
            }
            None => info!("PROXY_PORT not set, using default: {DEFAULT_PORT}"),
        }

        if let Some(raw) = lookup("PROXY_TIMEOUT_MS") {
            let ms: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                key: "PROXY_TIMEOUT_MS",
                reason: e.to_string(),
            })?;
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    key: "PROXY_TIMEOUT_MS",
                    reason: "timeout cannot be 0".into(),
                });
            }
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("PROXY_STRIP_HEADERS") {
            let rules = parse_rules(&raw);
            if rules.is_empty() {
                warn!("PROXY_STRIP_HEADERS is empty, every request header will be forwarded");
            }
            config.strip_headers = rules;
        }

        Ok(config)
    }
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
    fn upstream_is_required() {
        assert!(matches!(
            ProxyConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("PROXY_UPSTREAM_URL"))
        ));
    }

    #[test]
    fn defaults() {
        let cfg = ProxyConfig::from_lookup(lookup(&[("PROXY_UPSTREAM_URL", "http://api:8080/")])).unwrap();
        assert_eq!(cfg.upstream, "http://api:8080");
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.timeout, DEFAULT_UPSTREAM_TIMEOUT);
        assert_eq!(cfg.strip_headers, default_rules());
    }

    #[test]
    fn overrides() {
        let cfg = ProxyConfig::from_lookup(lookup(&[
            ("PROXY_UPSTREAM_URL", "http://api"),
            ("PROXY_PORT", "8081"),
            ("PROXY_TIMEOUT_MS", "500"),
            ("PROXY_STRIP_HEADERS", "host*,cookie"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.timeout, Duration::from_millis(500));
        assert_eq!(cfg.strip_headers.len(), 2);
    }

    #[test]
    fn invalid_numbers() {
        for (key, raw) in [("PROXY_PORT", "http"), ("PROXY_TIMEOUT_MS", "0")] {
            let res = ProxyConfig::from_lookup(lookup(&[("PROXY_UPSTREAM_URL", "http://api"), (key, raw)]));
            assert!(matches!(res, Err(ConfigError::Invalid { .. })), "{key}");
        }
    }
}
