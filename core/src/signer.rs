//! Per-request provenance headers.
//!
//! The backend expects `X-Sign = hex(SHA256(timestamp ++ nonce ++ secret))`
//! alongside the `X-Timestamp` and `X-Nonce` that went into it. Headers are
//! generated for every outbound request and never reused; a stale pair is
//! expected to be rejected upstream.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub const TIMESTAMP_HEADER: &str = "X-Timestamp";
pub const NONCE_HEADER: &str = "X-Nonce";
pub const SIGN_HEADER: &str = "X-Sign";

/// Headers proving a request came from a holder of the shared secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub timestamp: String,
    pub nonce: String,
    pub sign: String,
}

impl SignedHeaders {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            (TIMESTAMP_HEADER.to_string(), self.timestamp.clone()),
            (NONCE_HEADER.to_string(), self.nonce.clone()),
            (SIGN_HEADER.to_string(), self.sign.clone()),
        ]
    }
}

/// Signs requests with a process-wide shared secret.
#[derive(Clone)]
pub struct Signer {
    secret: String,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("secret", &"<redacted>").finish()
    }
}

impl Signer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Fresh headers from the current wall clock and a new nonce.
    pub fn sign(&self) -> SignedHeaders {
        let now = now_millis();
        self.sign_with(&now.to_string(), &generate_nonce(now))
    }

    /// Deterministic variant used by `sign` and by verification.
    pub fn sign_with(&self, timestamp: &str, nonce: &str) -> SignedHeaders {
        SignedHeaders {
            timestamp: timestamp.to_string(),
            nonce: nonce.to_string(),
            sign: compute_sign(timestamp, nonce, &self.secret),
        }
    }

    /// Check a received signature in constant time.
    pub fn verify(&self, timestamp: &str, nonce: &str, sign: &str) -> bool {
        let expected = compute_sign(timestamp, nonce, &self.secret);
        let received = sign.to_ascii_lowercase();
        if expected.len() != received.len() {
            return false;
        }
        expected.as_bytes().ct_eq(received.as_bytes()).into()
    }
}

/// Lowercase hex SHA-256 of `timestamp ++ nonce ++ secret`.
pub fn compute_sign(timestamp: &str, nonce: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.as_bytes());
    hasher.update(nonce.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random entropy followed by the base-36 clock, so two nonces drawn in the
/// same millisecond still differ through the random half.
pub fn generate_nonce(now_ms: u64) -> String {
    format!("{}{}", Uuid::new_v4().simple(), to_base36(now_ms))
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn sign_matches_known_digest() {
        // sha256("abc")
        assert_eq!(
            compute_sign("a", "b", "c"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sign_is_deterministic() {
        let s = Signer::new("secret");
        assert_eq!(s.sign_with("1700000000000", "n1"), s.sign_with("1700000000000", "n1"));
    }

    #[test]
    fn changing_any_input_changes_sign() {
        let base = compute_sign("1700000000000", "nonce", "secret");
        assert_ne!(base, compute_sign("1700000000001", "nonce", "secret"));
        assert_ne!(base, compute_sign("1700000000000", "nonce2", "secret"));
        assert_ne!(base, compute_sign("1700000000000", "nonce", "secret2"));
    }

    #[test]
    fn sign_is_lowercase_hex() {
        let sign = Signer::new("k").sign().sign;
        assert_eq!(sign.len(), 64);
        assert!(sign.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn nonces_do_not_collide_within_one_millisecond() {
        let now = now_millis();
        let nonces: HashSet<String> = (0..10_000).map(|_| generate_nonce(now)).collect();
        assert_eq!(nonces.len(), 10_000);
    }

    #[test]
    fn nonce_ends_with_base36_clock() {
        assert!(generate_nonce(35).ends_with('z'));
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn each_call_produces_fresh_headers() {
        let s = Signer::new("k");
        assert_ne!(s.sign().nonce, s.sign().nonce);
    }

    #[test]
    fn verify_accepts_own_signature_and_rejects_tampering() {
        let s = Signer::new("k");
        let h = s.sign();
        assert!(s.verify(&h.timestamp, &h.nonce, &h.sign));
        assert!(s.verify(&h.timestamp, &h.nonce, &h.sign.to_ascii_uppercase()));
        assert!(!s.verify(&h.timestamp, "other", &h.sign));
        assert!(!Signer::new("other").verify(&h.timestamp, &h.nonce, &h.sign));
        assert!(!s.verify(&h.timestamp, &h.nonce, "short"));
    }

    #[test]
    fn pairs_use_wire_header_names() {
        let pairs = Signer::new("k").sign_with("1", "n").to_pairs();
        let names: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["X-Timestamp", "X-Nonce", "X-Sign"]);
    }

    #[test]
    fn debug_redacts_secret() {
        let dbg = format!("{:?}", Signer::new("hunter2"));
        assert!(!dbg.contains("hunter2"));
    }
}
