//! Wire DTOs for the portal API.
//!
//! # Design
//! Field names follow the backend's camelCase JSON. Integer flags the backend
//! models as `0/1` stay integers rather than becoming `bool`, so unknown
//! values survive a round-trip. Payloads whose shape the backend does not
//! fix (online-player maps, quiz detail) are left as `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Online players, keyed by server name plus a `查询时间` query timestamp.
pub type OnlinePlayers = serde_json::Map<String, Value>;

/// One server's aggregated status. The backend uses Chinese keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDetail {
    #[serde(rename = "服务器名称")]
    pub name: String,
    #[serde(rename = "连接地址")]
    pub host: String,
    #[serde(rename = "连接端口")]
    pub port: String,
    #[serde(rename = "版本")]
    pub version: String,
    #[serde(rename = "核心")]
    pub core: String,
    #[serde(rename = "Rcon连接")]
    pub rcon: String,
    #[serde(rename = "在线状态")]
    pub online_status: String,
    #[serde(rename = "在线人数")]
    pub online_count: i64,
    #[serde(rename = "最大人数")]
    pub max_players: i64,
    #[serde(rename = "延迟(ms)")]
    pub latency_ms: i64,
    #[serde(rename = "指标")]
    pub metrics: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerServerInfo {
    pub status: String,
    #[serde(rename = "nameTag")]
    pub name_tag: String,
    pub version: String,
    pub ip: String,
    pub port: String,
    pub core: String,
    pub up_time: String,
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: i64,
    pub answer_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    /// 1 single choice, 2 multiple choice, 3 free text, 4 verification.
    pub question_type: i64,
    #[serde(default)]
    pub is_required: i64,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<i64>,
    #[serde(default)]
    pub whitelist_quiz_answer_vo_list: Vec<QuizOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: i64,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuizSubmission<'a> {
    pub code: &'a str,
    pub answers: &'a [QuizAnswer],
}

// ---------------------------------------------------------------------------
// Change id
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeIdRequest {
    pub old_user_name: String,
    pub new_user_name: String,
    pub qq_num: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Whitelist user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub qq_num: String,
    pub code: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    pub expire_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineRecord {
    pub id: i64,
    pub user_name: String,
    pub whitelist_id: Option<i64>,
    pub login_time: String,
    pub logout_time: Option<String>,
    pub play_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMe {
    pub user_id: i64,
    pub whitelist_id: i64,
    pub user_name: String,
    pub qq_num: String,
    #[serde(default)]
    pub role_level: Option<i64>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub can_initiate_vote: Option<i64>,
    pub token: String,
    pub login_time: i64,
    pub expire_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub me: UserMe,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub check_info: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub online_records: Vec<OnlineRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    pub whitelist_id: i64,
    pub show_qq: i64,
    pub show_city: i64,
    pub show_last_online: i64,
    pub show_game_time: i64,
    pub show_name_history: i64,
    pub show_quiz_result: i64,
    pub show_uuid: i64,
}

/// Partial privacy update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_qq: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_city: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_last_online: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_game_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_name_history: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_quiz_result: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_uuid: Option<i64>,
}

// ---------------------------------------------------------------------------
// Vote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTemplate {
    pub id: i64,
    pub template_code: String,
    pub template_name: String,
    #[serde(default)]
    pub template_desc: Option<String>,
    pub min_required_votes: i64,
    pub vote_duration_seconds: i64,
    pub need_reason: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub id: i64,
    pub vote_id: i64,
    pub voter_user_name: String,
    pub vote_decision: i64,
    #[serde(default)]
    pub vote_comment: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteInstance {
    pub id: i64,
    pub template_name: String,
    pub template_code: String,
    #[serde(default)]
    pub target_player_name: Option<String>,
    #[serde(default)]
    pub target_whitelist_id: Option<i64>,
    pub initiator_user_name: String,
    pub required_votes: i64,
    pub agree_votes: i64,
    pub reject_votes: i64,
    pub status: String,
    #[serde(default)]
    pub expire_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub vote_records: Vec<VoteRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotePage {
    pub rows: Vec<VoteInstance>,
    pub total: i64,
}

/// Filters for the vote list; unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteListQuery {
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<String>,
    pub target_player_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCreateForm {
    pub template_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_whitelist_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A ballot. The backend only accepts agree (1) or reject (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDecision {
    Agree,
    Reject,
}

impl Serialize for VoteDecision {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            VoteDecision::Agree => 1,
            VoteDecision::Reject => 2,
        })
    }
}

impl<'de> Deserialize<'de> for VoteDecision {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(VoteDecision::Agree),
            2 => Ok(VoteDecision::Reject),
            other => Err(serde::de::Error::custom(format!("invalid vote decision {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCastForm {
    pub vote_id: i64,
    pub vote_decision: VoteDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_comment: Option<String>,
}
