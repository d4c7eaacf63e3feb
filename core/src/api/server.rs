//! Server status and online members.

use std::time::Duration;

use crate::client::{encode_segment, PortalClient};
use crate::http::{HttpMethod, HttpRequest};

/// Status aggregation polls every game server, so it gets a longer deadline.
pub const SERVER_STATUS_TIMEOUT: Duration = Duration::from_millis(20_000);

impl PortalClient {
    /// `GET /api/v1/getOnlinePlayer` → `OnlinePlayers`.
    pub fn build_get_online_players(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/v1/getOnlinePlayer", &[], None)
    }

    /// `GET /api/v1/getServerStatus` → `Vec<ServerDetail>`.
    pub fn build_get_server_status(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/v1/getServerStatus", &[], None)
            .with_timeout(SERVER_STATUS_TIMEOUT)
    }

    /// `GET /api/v1/getServerInfoByGameId/{gameId}` → `Vec<PlayerServerInfo>`.
    pub fn build_get_player_servers(&self, game_id: &str) -> HttpRequest {
        let endpoint = format!("/api/v1/getServerInfoByGameId/{}", encode_segment(game_id));
        self.request(HttpMethod::Get, &endpoint, &[], None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client;

    #[test]
    fn online_players_uses_default_deadline() {
        let req = client().build_get_online_players();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://backend.test/api/v1/getOnlinePlayer");
        assert!(req.timeout.is_none());
    }

    #[test]
    fn server_status_overrides_deadline() {
        let req = client().build_get_server_status();
        assert_eq!(req.timeout, Some(SERVER_STATUS_TIMEOUT));
    }

    #[test]
    fn player_servers_encodes_game_id() {
        let req = client().build_get_player_servers("Steve Alex");
        assert_eq!(req.path, "http://backend.test/api/v1/getServerInfoByGameId/Steve%20Alex");
    }
}
