//! In-game ID change, confirmed by a QQ verification code.

use crate::client::PortalClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::ChangeIdRequest;

impl PortalClient {
    /// `POST /api/v1/requestChangeId`.
    pub fn build_request_change_id(&self, form: &ChangeIdRequest) -> Result<HttpRequest, ApiError> {
        self.request_json(HttpMethod::Post, "/api/v1/requestChangeId", &[], form, None)
    }

    /// `POST /api/v1/confirmChangeId?code=&qqNum=` with an empty body.
    pub fn build_confirm_change_id(&self, code: &str, qq_num: &str) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            "/api/v1/confirmChangeId",
            &[("code", code), ("qqNum", qq_num)],
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client;

    #[test]
    fn confirm_sends_params_in_query() {
        let req = client().build_confirm_change_id("123456", "10001");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.path,
            "http://backend.test/api/v1/confirmChangeId?code=123456&qqNum=10001"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn request_omits_missing_reason() {
        let form = ChangeIdRequest {
            old_user_name: "Steve".into(),
            new_user_name: "Alex".into(),
            qq_num: "10001".into(),
            change_reason: None,
        };
        let req = client().build_request_change_id(&form).unwrap();
        assert!(!req.body.as_deref().unwrap().contains("changeReason"));
    }
}
