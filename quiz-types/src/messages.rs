use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::{AnswerId, AnswerValue, QuestionId, SessionId};

/// Response of `POST /quiz/{id}/start_session/`; extra fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StartSessionResponse {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: SessionId,
}

/// Body of `POST /quiz/{id}/submit_answer/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitAnswerRequest {
    pub session_id: SessionId,
    pub question_id: QuestionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<AnswerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_answer: Option<String>,
}

impl SubmitAnswerRequest {
    /// Choice answers travel as `answer_id`, text as `text_answer`.
    /// Structured answers are JSON encoded into `text_answer`.
    pub fn new(session_id: SessionId, question_id: QuestionId, value: &AnswerValue) -> Self {
        let (answer_id, text_answer) = match value {
            AnswerValue::Choice(id) => (Some(id.clone()), None),
            AnswerValue::Text(text) => (None, Some(text.clone())),
            AnswerValue::Matching(map) | AnswerValue::Blanks(map) => {
                (None, serde_json::to_string(map).ok())
            }
            AnswerValue::Ordering(items) => (None, serde_json::to_string(items).ok()),
        };

        Self {
            session_id,
            question_id,
            answer_id,
            text_answer,
        }
    }
}

/// Body of `POST /quiz/{id}/complete_session/`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompleteSessionRequest {
    pub session_id: SessionId,
}

/// Whatever scoring fields the backend chose to return. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompleteSessionResponse {
    #[serde(default)]
    pub correct_answers: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub earned_points: Option<u32>,
    #[serde(default)]
    pub total_points: Option<u32>,
    #[serde(default, deserialize_with = "percentage_from_number")]
    pub percentage: Option<u8>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
}

/// Backend ids come back either as strings or as integers.
pub fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(n) => n.to_string(),
    })
}

fn percentage_from_number<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value
        .filter(|p| p.is_finite())
        .map(|p| p.round().clamp(0.0, 100.0) as u8))
}
