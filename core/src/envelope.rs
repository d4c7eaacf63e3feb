//! The `{code, data, msg}` wrapper every backend response uses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// The only envelope code the client treats as success.
pub const SUCCESS_CODE: i64 = 200;

/// Envelope returned on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// Untyped view used before `data` is checked, so a rejection never fails
/// on a `data` shape mismatch.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    code: i64,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    msg: Option<String>,
}

/// Unwrap a response into its envelope.
///
/// - parseable envelope, `code == 200`: `Ok(envelope)` unchanged
/// - parseable envelope, any other code: `ApiError::Application`
/// - no envelope, non-2xx status: `ApiError::Transport`
/// - no envelope (or mismatched `data`) on 2xx: `ApiError::Decode`
pub fn unwrap_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    let raw: RawEnvelope = match serde_json::from_str(&response.body) {
        Ok(raw) => raw,
        Err(e) if response.is_success() => return Err(ApiError::Decode(e.to_string())),
        Err(_) => {
            return Err(ApiError::transport(format!(
                "HTTP {} without a response envelope",
                response.status
            )))
        }
    };

    if raw.code != SUCCESS_CODE {
        return Err(ApiError::application(raw.code, raw.msg));
    }

    let data = serde_json::from_value(raw.data).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(Envelope {
        code: raw.code,
        data,
        msg: raw.msg,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::FALLBACK_MESSAGE;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn success_returns_data_unmodified() {
        let body = json!({"code": 200, "data": {"servers": [{"name": "main", "players": ["a"]}]}});
        let env: Envelope<Value> = unwrap_envelope(&response(200, &body.to_string())).unwrap();
        assert_eq!(env.code, 200);
        assert_eq!(env.data, body["data"]);
        assert!(env.msg.is_none());
    }

    #[test]
    fn success_keeps_msg() {
        let env: Envelope<Value> =
            unwrap_envelope(&response(200, r#"{"code":200,"data":null,"msg":"ok"}"#)).unwrap();
        assert_eq!(env.msg.as_deref(), Some("ok"));
    }

    #[test]
    fn missing_data_reads_as_null() {
        let env: Envelope<Option<u32>> = unwrap_envelope(&response(200, r#"{"code":200,"msg":"done"}"#)).unwrap();
        assert_eq!(env.data, None);
    }

    #[test]
    fn rejection_carries_msg_and_discards_data() {
        let err = unwrap_envelope::<Value>(&response(200, r#"{"code":400,"data":{"x":1},"msg":"bad code"}"#))
            .unwrap_err();
        match err {
            ApiError::Application { code, msg } => {
                assert_eq!(code, 400);
                assert_eq!(msg, "bad code");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejection_without_msg_uses_fallback() {
        let err = unwrap_envelope::<Value>(&response(200, r#"{"code":500}"#)).unwrap_err();
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[test]
    fn rejection_ignores_data_shape() {
        let err = unwrap_envelope::<Vec<String>>(&response(200, r#"{"code":401,"data":"nope","msg":"login"}"#))
            .unwrap_err();
        assert_eq!(err.code(), Some(401));
    }

    #[test]
    fn non_2xx_with_envelope_is_application_error() {
        let err = unwrap_envelope::<Value>(&response(404, r#"{"code":404,"msg":"not found"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Application { code: 404, .. }));
    }

    #[test]
    fn non_2xx_without_envelope_is_transport_error() {
        let err = unwrap_envelope::<Value>(&response(502, "<html>bad gateway</html>")).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn garbage_on_2xx_is_decode_error() {
        let err = unwrap_envelope::<Value>(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn data_type_mismatch_is_decode_error() {
        let err = unwrap_envelope::<Vec<u32>>(&response(200, r#"{"code":200,"data":"text"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
