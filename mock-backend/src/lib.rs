//! In-memory stand-in for the portal backend.
//!
//! Verifies `X-Sign` on every `/api/v1` route, answers with `{code, data,
//! msg}` envelopes and keeps sessions and votes in memory. Responses are
//! gzipped for clients that ask for it. `/debug` routes skip signature
//! checks and exist for exercising the proxy: echoing what arrived,
//! answering 404, stalling, or returning a non-JSON body.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{OriginalUri, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use portal_core::signer::{Signer, NONCE_HEADER, SIGN_HEADER, TIMESTAMP_HEADER};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::compression::CompressionLayer;
use tracing::{debug, warn};
use uuid::Uuid;

pub const TEST_SECRET: &str = "mock-secret";
pub const TEST_USER: &str = "Steve";
pub const TEST_PASSWORD: &str = "correct horse";

#[derive(Default)]
pub struct Db {
    sessions: HashMap<String, String>,
    votes: HashMap<i64, Value>,
}

pub type SharedDb = Arc<RwLock<Db>>;

#[derive(Clone)]
pub struct AppState {
    pub signer: Signer,
    pub db: SharedDb,
}

pub fn app() -> Router {
    app_with_secret(TEST_SECRET)
}

pub fn app_with_secret(secret: &str) -> Router {
    let mut db = Db::default();
    db.votes.insert(1, seed_vote());
    let state = AppState {
        signer: Signer::new(secret),
        db: Arc::new(RwLock::new(db)),
    };

    let api = Router::new()
        .route("/getOnlinePlayer", get(online_players))
        .route("/getServerStatus", get(server_status))
        .route("/getQuestions", get(questions))
        .route("/whitelist-user/login", post(login))
        .route("/whitelist-user/me", get(me))
        .route("/whitelist-user/vote/cast", post(cast_vote))
        .route("/whitelist-user/vote/{id}", get(vote_detail))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_signature));

    let debug = Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/missing", get(missing))
        .route("/slow", get(slow))
        .route("/plain", get(plain));

    Router::new()
        .nest("/api/v1", api)
        .nest("/debug", debug)
        .layer(CompressionLayer::new())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({"code": 200, "data": data}))
}

fn reject(status: StatusCode, code: i64, msg: &str) -> Response {
    (status, Json(json!({"code": code, "msg": msg}))).into_response()
}

async fn require_signature(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default();
    let (ts, nonce, sign) = (value(TIMESTAMP_HEADER), value(NONCE_HEADER), value(SIGN_HEADER));

    if ts.is_empty() || nonce.is_empty() || !state.signer.verify(ts, nonce, sign) {
        warn!(uri = %request.uri(), "rejecting unsigned request");
        return reject(StatusCode::UNAUTHORIZED, 401, "签名校验失败");
    }
    next.run(request).await
}

async fn session_user(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let token = headers.get("whitelist-token")?.to_str().ok()?;
    state.db.read().await.sessions.get(token).cloned()
}

async fn online_players() -> Json<Value> {
    ok(json!({
        "main": {"online": 2, "players": ["Steve", "Alex"]},
        "查询时间": "2024-01-01 12:00:00"
    }))
}

async fn server_status() -> Json<Value> {
    ok(json!([{
        "服务器名称": "main",
        "连接地址": "mc.example.org",
        "连接端口": "25565",
        "版本": "1.20.4",
        "核心": "Paper",
        "Rcon连接": "ok",
        "在线状态": "online",
        "在线人数": 2,
        "最大人数": 50,
        "延迟(ms)": 12,
        "指标": ""
    }]))
}

#[derive(Deserialize)]
struct CodeQuery {
    code: Option<String>,
}

async fn questions(Query(q): Query<CodeQuery>) -> Response {
    match q.code.as_deref() {
        Some("valid-code") => ok(json!([
            {"id": 2, "questionText": "Name a block", "questionType": 3, "isRequired": 1, "sortOrder": 2},
            {"id": 1, "questionText": "Read the rules?", "questionType": 1, "isRequired": 1, "sortOrder": 1,
             "whitelistQuizAnswerVoList": [{"id": 10, "answerText": "Yes"}, {"id": 11, "answerText": "No"}]}
        ]))
        .into_response(),
        _ => Json(json!({"code": 400, "msg": "验证码无效"})).into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginInput {
    user_name: String,
    password: String,
}

async fn login(State(state): State<AppState>, Json(input): Json<LoginInput>) -> Response {
    if input.user_name != TEST_USER || input.password != TEST_PASSWORD {
        // No msg on purpose: clients must fall back to their own text.
        return Json(json!({"code": 500})).into_response();
    }
    let token = Uuid::new_v4().simple().to_string();
    state
        .db
        .write()
        .await
        .sessions
        .insert(token.clone(), input.user_name);
    debug!("session issued");
    ok(json!({"token": token, "expireTime": 4_102_444_800_000i64})).into_response()
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(user) = session_user(&state, &headers).await else {
        return Json(json!({"code": 401, "msg": "请先登录"})).into_response();
    };
    let token = headers
        .get("whitelist-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    ok(json!({
        "userId": 1, "whitelistId": 1, "userName": user, "qqNum": "10001",
        "roleLevel": 1, "roleTitle": "member", "canInitiateVote": 1,
        "token": token, "loginTime": 1_700_000_000_000i64, "expireTime": 4_102_444_800_000i64
    }))
    .into_response()
}

fn seed_vote() -> Value {
    json!({
        "id": 1, "templateName": "Ban", "templateCode": "BAN", "targetPlayerName": "Griefer",
        "initiatorUserName": "Alex", "requiredVotes": 3, "agreeVotes": 0, "rejectVotes": 0,
        "status": "ACTIVE", "voteRecords": []
    })
}

async fn vote_detail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.db.read().await.votes.get(&id) {
        Some(vote) => ok(vote.clone()).into_response(),
        None => Json(json!({"code": 404, "msg": "投票不存在"})).into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CastInput {
    vote_id: i64,
    vote_decision: u8,
    vote_comment: Option<String>,
}

async fn cast_vote(State(state): State<AppState>, headers: HeaderMap, Json(input): Json<CastInput>) -> Response {
    let Some(user) = session_user(&state, &headers).await else {
        return Json(json!({"code": 401, "msg": "请先登录"})).into_response();
    };
    let mut db = state.db.write().await;
    let Some(vote) = db.votes.get_mut(&input.vote_id) else {
        return Json(json!({"code": 404, "msg": "投票不存在"})).into_response();
    };
    let counter = match input.vote_decision {
        1 => "agreeVotes",
        2 => "rejectVotes",
        _ => return Json(json!({"code": 400, "msg": "无效的投票选项"})).into_response(),
    };
    vote[counter] = json!(vote[counter].as_i64().unwrap_or_default() + 1);
    if let Some(records) = vote["voteRecords"].as_array_mut() {
        let id = records.len() as i64 + 1;
        records.push(json!({
            "id": id, "voteId": input.vote_id, "voterUserName": user,
            "voteDecision": input.vote_decision, "voteComment": input.vote_comment
        }));
    }
    ok(vote.clone()).into_response()
}

async fn echo(OriginalUri(uri): OriginalUri, request: Request) -> Json<Value> {
    let method = request.method().to_string();
    let uri = uri.to_string();
    let headers: serde_json::Map<String, Value> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), json!(v.to_str().unwrap_or_default())))
        .collect();
    let body = axum::body::to_bytes(request.into_body(), 1 << 20)
        .await
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default();
    ok(json!({"method": method, "uri": uri, "headers": headers, "body": body}))
}

async fn missing() -> Response {
    reject(StatusCode::NOT_FOUND, 404, "not found")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    ok(Value::Null)
}

async fn plain() -> &'static str {
    "upstream says hi"
}
