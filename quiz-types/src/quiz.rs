use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::messages::id_from_string_or_number;
use crate::{AnswerId, QuestionId, QuizId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quiz {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: Difficulty,
    /// Minutes; `None` means the attempt is untimed
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub is_public: bool,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn total_points(&self) -> u32 {
        self.questions
            .iter()
            .fold(0, |total: u32, q| total.saturating_add(q.points))
    }

    pub fn time_limit_seconds(&self) -> Option<u32> {
        self.time_limit.filter(|m| *m > 0).map(|m| m.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: QuestionId,
    pub prompt: String,
    pub points: u32,
    pub kind: QuestionKind,
}

/// Question body, tagged by the backend's question type.
///
/// Unknown tags land in `Unsupported` so a single malformed question
/// never prevents the rest of the quiz from loading.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionKind {
    SingleChoice { answers: Vec<AnswerOption> },
    TrueFalse { answers: Vec<AnswerOption> },
    ShortAnswer { answers: Vec<AnswerOption> },
    Matching { pairs: Vec<MatchPair> },
    Ordering { items: Vec<OrderItem> },
    FillBlank {
        #[serde(default)]
        template: Option<String>,
        blanks: Vec<Blank>,
    },
    #[serde(other)]
    Unsupported,
}

impl QuestionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "single_choice",
            QuestionKind::TrueFalse { .. } => "true_false",
            QuestionKind::ShortAnswer { .. } => "short_answer",
            QuestionKind::Matching { .. } => "matching",
            QuestionKind::Ordering { .. } => "ordering",
            QuestionKind::FillBlank { .. } => "fill_blank",
            QuestionKind::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerOption {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: AnswerId,
    pub text: String,
    pub is_correct: bool,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchPair {
    pub left_id: String,
    pub left: String,
    pub right_id: String,
    pub right: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub text: String,
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Blank {
    pub id: String,
    pub correct: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}
