//! Governance votes.

use crate::client::PortalClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{VoteCastForm, VoteCreateForm, VoteListQuery};

const PREFIX: &str = "/api/v1/whitelist-user/vote";

impl PortalClient {
    /// `GET /template/list` → `Vec<VoteTemplate>`.
    pub fn build_list_vote_templates(&self) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("{PREFIX}/template/list"), &[], None)
    }

    /// `GET /list` → `VotePage`.
    pub fn build_list_votes(&self, filter: &VoteListQuery) -> HttpRequest {
        let page_num = filter.page_num.map(|n| n.to_string());
        let page_size = filter.page_size.map(|n| n.to_string());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(n) = &page_num {
            query.push(("pageNum", n.as_str()));
        }
        if let Some(n) = &page_size {
            query.push(("pageSize", n.as_str()));
        }
        if let Some(s) = &filter.status {
            query.push(("status", s.as_str()));
        }
        if let Some(name) = &filter.target_player_name {
            query.push(("targetPlayerName", name.as_str()));
        }
        self.request(HttpMethod::Get, &format!("{PREFIX}/list"), &query, None)
    }

    /// `GET /{id}` → `VoteInstance`.
    pub fn build_get_vote(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("{PREFIX}/{id}"), &[], None)
    }

    /// `POST /create` → `VoteInstance`.
    pub fn build_create_vote(&self, token: &str, form: &VoteCreateForm) -> Result<HttpRequest, ApiError> {
        self.request_json(HttpMethod::Post, &format!("{PREFIX}/create"), &[], form, Some(token))
    }

    /// `POST /cast` → `VoteInstance`.
    pub fn build_cast_vote(&self, token: &str, form: &VoteCastForm) -> Result<HttpRequest, ApiError> {
        self.request_json(HttpMethod::Post, &format!("{PREFIX}/cast"), &[], form, Some(token))
    }
}
