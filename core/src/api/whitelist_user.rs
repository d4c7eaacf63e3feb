//! Member accounts: registration, login, profile and privacy.
//!
//! Everything past `login` needs the session token the backend issued there.

use serde::Serialize;

use crate::client::PortalClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{LoginForm, PrivacyUpdate, RegisterForm};

const PREFIX: &str = "/api/v1/whitelist-user";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendCode<'a> {
    qq_num: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePassword<'a> {
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangeGameId<'a> {
    new_user_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    change_reason: Option<&'a str>,
}

impl PortalClient {
    /// `POST /sendCode` with `{qqNum}`.
    pub fn build_send_user_code(&self, qq_num: &str) -> Result<HttpRequest, ApiError> {
        let endpoint = format!("{PREFIX}/sendCode");
        self.request_json(HttpMethod::Post, &endpoint, &[], &SendCode { qq_num }, None)
    }

    pub fn build_register_user(&self, form: &RegisterForm) -> Result<HttpRequest, ApiError> {
        let endpoint = format!("{PREFIX}/register");
        self.request_json(HttpMethod::Post, &endpoint, &[], form, None)
    }

    /// `POST /login` → `LoginResult`.
    pub fn build_login_user(&self, form: &LoginForm) -> Result<HttpRequest, ApiError> {
        let endpoint = format!("{PREFIX}/login");
        self.request_json(HttpMethod::Post, &endpoint, &[], form, None)
    }

    /// `GET /profile` → `UserProfile`.
    pub fn build_get_user_profile(&self, token: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("{PREFIX}/profile"), &[], Some(token))
    }

    /// `GET /me` → `UserMe`.
    pub fn build_get_user_me(&self, token: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("{PREFIX}/me"), &[], Some(token))
    }

    pub fn build_change_user_password(
        &self,
        token: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = ChangePassword {
            old_password,
            new_password,
        };
        let endpoint = format!("{PREFIX}/changePassword");
        self.request_json(HttpMethod::Post, &endpoint, &[], &body, Some(token))
    }

    pub fn build_change_user_game_id(
        &self,
        token: &str,
        new_user_name: &str,
        change_reason: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = ChangeGameId {
            new_user_name,
            change_reason,
        };
        let endpoint = format!("{PREFIX}/changeGameId");
        self.request_json(HttpMethod::Post, &endpoint, &[], &body, Some(token))
    }

    /// `GET /privacy` → `Privacy`.
    pub fn build_get_user_privacy(&self, token: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("{PREFIX}/privacy"), &[], Some(token))
    }

    pub fn build_update_user_privacy(&self, token: &str, update: &PrivacyUpdate) -> Result<HttpRequest, ApiError> {
        let endpoint = format!("{PREFIX}/privacy");
        self.request_json(HttpMethod::Post, &endpoint, &[], update, Some(token))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::api::test_support::client;
    use crate::client::TOKEN_HEADER;

    fn body(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn login_is_anonymous() {
        let form = LoginForm {
            user_name: "Steve".into(),
            password: "pw".into(),
        };
        let req = client().build_login_user(&form).unwrap();
        assert_eq!(req.path, "http://backend.test/api/v1/whitelist-user/login");
        assert!(req.header(TOKEN_HEADER).is_none());
        assert_eq!(body(&req), json!({"userName": "Steve", "password": "pw"}));
    }

    #[test]
    fn session_calls_carry_token() {
        let c = client();
        let requests = [
            c.build_get_user_profile("t1"),
            c.build_get_user_me("t1"),
            c.build_get_user_privacy("t1"),
            c.build_change_user_password("t1", "a", "b").unwrap(),
            c.build_change_user_game_id("t1", "Alex", None).unwrap(),
            c.build_update_user_privacy("t1", &PrivacyUpdate::default()).unwrap(),
        ];
        for req in requests {
            assert_eq!(req.header(TOKEN_HEADER), Some("t1"), "{}", req.path);
        }
    }

    #[test]
    fn change_game_id_body() {
        let req = client().build_change_user_game_id("t", "Alex", Some("typo")).unwrap();
        assert_eq!(body(&req), json!({"newUserName": "Alex", "changeReason": "typo"}));
    }

    #[test]
    fn send_code_body() {
        let req = client().build_send_user_code("10001").unwrap();
        assert_eq!(body(&req), json!({"qqNum": "10001"}));
    }
}
