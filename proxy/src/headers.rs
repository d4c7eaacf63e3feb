//! Which request headers must not be echoed upstream.
//!
//! `host` and `connection` are matched as prefixes, as the portal always
//! did. The rest of the hop-by-hop set is matched exactly, plus
//! `content-length` and `accept-encoding`, which the outbound client sets
//! itself.

use axum::http::HeaderMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderRule {
    Prefix(String),
    Exact(String),
}

impl HeaderRule {
    /// `name*` is a prefix rule, anything else an exact name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        match raw.strip_suffix('*') {
            Some("") => None,
            Some(prefix) => Some(HeaderRule::Prefix(prefix.to_string())),
            None if raw.is_empty() => None,
            None => Some(HeaderRule::Exact(raw)),
        }
    }

    fn matches(&self, lowercase_name: &str) -> bool {
        match self {
            HeaderRule::Prefix(p) => lowercase_name.starts_with(p.as_str()),
            HeaderRule::Exact(n) => lowercase_name == n,
        }
    }
}

pub fn default_rules() -> Vec<HeaderRule> {
    let mut rules = vec![
        HeaderRule::Prefix("host".into()),
        HeaderRule::Prefix("connection".into()),
    ];
    rules.extend(
        [
            "keep-alive",
            "transfer-encoding",
            "upgrade",
            "proxy-authenticate",
            "proxy-authorization",
            "te",
            "trailer",
            "trailers",
            "content-length",
            "accept-encoding",
        ]
        .into_iter()
        .map(|n| HeaderRule::Exact(n.to_string())),
    );
    rules
}

/// Parse a comma-separated rule list; blank entries are skipped.
pub fn parse_rules(raw: &str) -> Vec<HeaderRule> {
    raw.split(',').filter_map(HeaderRule::parse).collect()
}

pub fn is_stripped(name: &str, rules: &[HeaderRule]) -> bool {
    let name = name.to_ascii_lowercase();
    rules.iter().any(|r| r.matches(&name))
}

/// Copy `incoming` minus every header a rule matches.
pub fn forwardable(incoming: &HeaderMap, rules: &[HeaderRule]) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(incoming.len());
    for (name, value) in incoming {
        if !is_stripped(name.as_str(), rules) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
