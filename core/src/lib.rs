//! Signed request pipeline for the whitelist portal API.
//!
//! # Overview
//! Every backend call is signed with `X-Timestamp`/`X-Nonce`/`X-Sign`,
//! addressed either directly to the backend or to the same-origin proxy, and
//! answered with a `{code, data, msg}` envelope. This crate builds those
//! requests and unwraps those envelopes without touching the network
//! (host-does-IO pattern); the `transport` feature adds an async executor.
//!
//! # Design
//! - `PortalClient` holds only the resolved base URL, signer and default
//!   deadline. Configuration and runtime context are injected at
//!   construction.
//! - Endpoint builders (`api`) are thin: signing, base URL and envelope
//!   handling all happen in `PortalClient`.
//! - `ApiError` keeps transport failures apart from application rejections.

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod signer;
#[cfg(feature = "transport")]
pub mod transport;
pub mod types;

pub use client::{PortalClient, TOKEN_HEADER};
pub use config::{ClientConfig, RuntimeContext, PROXY_BASE_PATH};
pub use envelope::{unwrap_envelope, Envelope, SUCCESS_CODE};
pub use error::{ApiError, ConfigError, FALLBACK_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use signer::{SignedHeaders, Signer};
#[cfg(feature = "transport")]
pub use transport::{ApiClient, CancelToken};
