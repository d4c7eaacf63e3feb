//! Typed request builders, one per backend endpoint.
//!
//! Each submodule adds `build_*` methods to `PortalClient`. They only fix
//! the path, query, body and session token; signing and base-URL selection
//! happen in `PortalClient::request`. Responses are unwrapped with
//! `PortalClient::parse` into the DTOs from `crate::types`.

pub mod change_id;
pub mod quiz;
pub mod server;
pub mod vote;
pub mod whitelist_user;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{ClientConfig, RuntimeContext};
    use crate::PortalClient;

    pub fn client() -> PortalClient {
        PortalClient::new(
            ClientConfig::new("http://backend.test", "secret"),
            RuntimeContext::server(),
        )
    }
}
