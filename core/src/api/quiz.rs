//! Screening quiz.

use crate::client::{encode_segment, PortalClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{QuizAnswer, QuizSubmission};

/// `msg` returned by `checkQuizStatus` while the applicant still owes a quiz.
pub const QUIZ_PENDING_MSG: &str = "未完成问卷";

impl PortalClient {
    /// `GET /api/v1/getQuestions?code=` → `Vec<Question>`.
    pub fn build_get_questions(&self, code: &str) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/v1/getQuestions", &[("code", code)], None)
    }

    /// `POST /api/v1/submitQuiz` with `{code, answers}`.
    pub fn build_submit_quiz(&self, code: &str, answers: &[QuizAnswer]) -> Result<HttpRequest, ApiError> {
        let body = QuizSubmission { code, answers };
        self.request_json(HttpMethod::Post, "/api/v1/submitQuiz", &[], &body, None)
    }

    /// `GET /api/v1/checkQuizStatus?code=`; the verdict is in `msg`.
    pub fn build_check_quiz_status(&self, code: &str) -> HttpRequest {
        self.request(HttpMethod::Get, "/api/v1/checkQuizStatus", &[("code", code)], None)
    }

    /// `GET /api/v1/getQuizDetail/{quizId}` → `serde_json::Value`.
    pub fn build_get_quiz_detail(&self, quiz_id: &str) -> HttpRequest {
        let endpoint = format!("/api/v1/getQuizDetail/{}", encode_segment(quiz_id));
        self.request(HttpMethod::Get, &endpoint, &[], None)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::api::test_support::client;

    #[test]
    fn questions_pass_code_as_query() {
        let req = client().build_get_questions("abc123");
        assert_eq!(req.path, "http://backend.test/api/v1/getQuestions?code=abc123");
    }

    #[test]
    fn submission_body_shape() {
        let answers = vec![
            QuizAnswer { question_id: 1, answer: "2".into(), verification_id: None },
            QuizAnswer { question_id: 4, answer: "ok".into(), verification_id: Some(9) },
        ];
        let req = client().build_submit_quiz("abc", &answers).unwrap();
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"code": "abc", "answers": [
                {"questionId": 1, "answer": "2"},
                {"questionId": 4, "answer": "ok", "verificationId": 9}
            ]})
        );
    }

    #[test]
    fn quiz_detail_path() {
        let req = client().build_get_quiz_detail("42");
        assert_eq!(req.path, "http://backend.test/api/v1/getQuizDetail/42");
    }
}
