use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{AnswerId, QuestionKind};

/// A captured answer. The variant mirrors the question kind it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum AnswerValue {
    /// Selected answer id for single-choice and true/false
    Choice(AnswerId),
    /// Free text for short-answer
    Text(String),
    /// Left item id -> right item id
    Matching(BTreeMap<String, String>),
    /// Item ids in the order the user arranged them
    Ordering(Vec<String>),
    /// Blank id -> typed text
    Blanks(BTreeMap<String, String>),
}

impl AnswerValue {
    /// Empty strings and empty collections count as no answer at all.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Choice(id) => id.trim().is_empty(),
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Matching(map) => map.is_empty(),
            AnswerValue::Ordering(items) => items.is_empty(),
            AnswerValue::Blanks(map) => map.is_empty(),
        }
    }

    /// Whether this value has the shape the given question kind captures.
    pub fn fits(&self, kind: &QuestionKind) -> bool {
        matches!(
            (self, kind),
            (AnswerValue::Choice(_), QuestionKind::SingleChoice { .. })
                | (AnswerValue::Choice(_), QuestionKind::TrueFalse { .. })
                | (AnswerValue::Text(_), QuestionKind::ShortAnswer { .. })
                | (AnswerValue::Matching(_), QuestionKind::Matching { .. })
                | (AnswerValue::Ordering(_), QuestionKind::Ordering { .. })
                | (AnswerValue::Blanks(_), QuestionKind::FillBlank { .. })
        )
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            AnswerValue::Choice(_) => "choice",
            AnswerValue::Text(_) => "text",
            AnswerValue::Matching(_) => "matching",
            AnswerValue::Ordering(_) => "ordering",
            AnswerValue::Blanks(_) => "blanks",
        }
    }
}

/// Answers keyed by question index. One value per index, replaced on re-answer.
pub type AnswerMap = BTreeMap<usize, AnswerValue>;
