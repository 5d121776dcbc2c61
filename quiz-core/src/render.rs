//! Presentation model for a single question.
//!
//! A [`QuestionView`] describes which capture widget to show and what it currently
//! holds. [`parse_input`] turns raw user input back into an [`AnswerValue`] of the
//! shape the question expects; the player stores it without looking inside.

use quiz_types::{AnswerOption, AnswerValue, Question, QuestionKind, QuizError};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub question_id: String,
    pub prompt: String,
    pub points: u32,
    pub widget: Widget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub left_id: String,
    pub left: String,
    pub selected_right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labeled {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlankInput {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Widget {
    Choices {
        options: Vec<ChoiceOption>,
    },
    TextInput {
        value: String,
    },
    Matching {
        rows: Vec<MatchRow>,
        right_options: Vec<Labeled>,
    },
    Ordering {
        items: Vec<Labeled>,
    },
    FillBlank {
        template: Option<String>,
        blanks: Vec<BlankInput>,
    },
    /// Placeholder for question data this client cannot handle
    Unsupported {
        type_name: String,
    },
}

impl QuestionView {
    pub fn build(question: &Question, current: Option<&AnswerValue>) -> Self {
        let widget = match &question.kind {
            QuestionKind::SingleChoice { answers } | QuestionKind::TrueFalse { answers } => {
                let selected = match current {
                    Some(AnswerValue::Choice(id)) => Some(id.as_str()),
                    _ => None,
                };
                Widget::Choices {
                    options: display_options(answers)
                        .into_iter()
                        .map(|a| ChoiceOption {
                            id: a.id.clone(),
                            text: a.text.clone(),
                            selected: selected == Some(a.id.as_str()),
                        })
                        .collect(),
                }
            }
            QuestionKind::ShortAnswer { .. } => Widget::TextInput {
                value: match current {
                    Some(AnswerValue::Text(text)) => text.clone(),
                    _ => String::new(),
                },
            },
            QuestionKind::Matching { pairs } => {
                let chosen = match current {
                    Some(AnswerValue::Matching(map)) => Some(map),
                    _ => None,
                };
                let mut right_options: Vec<Labeled> = pairs
                    .iter()
                    .map(|p| Labeled {
                        id: p.right_id.clone(),
                        text: p.right.clone(),
                    })
                    .collect();
                // Listed alphabetically so the layout does not give the pairing away
                right_options.sort_by(|a, b| a.text.cmp(&b.text));

                Widget::Matching {
                    rows: pairs
                        .iter()
                        .map(|p| MatchRow {
                            left_id: p.left_id.clone(),
                            left: p.left.clone(),
                            selected_right: chosen.and_then(|m| m.get(&p.left_id).cloned()),
                        })
                        .collect(),
                    right_options,
                }
            }
            QuestionKind::Ordering { items } => {
                let mut labeled: Vec<Labeled> = items
                    .iter()
                    .map(|i| Labeled {
                        id: i.id.clone(),
                        text: i.text.clone(),
                    })
                    .collect();

                match current {
                    Some(AnswerValue::Ordering(order)) => {
                        labeled.sort_by_key(|item| {
                            order.iter().position(|id| *id == item.id).unwrap_or(usize::MAX)
                        });
                    }
                    _ => labeled.sort_by(|a, b| a.text.cmp(&b.text)),
                }

                Widget::Ordering { items: labeled }
            }
            QuestionKind::FillBlank { template, blanks } => {
                let filled = match current {
                    Some(AnswerValue::Blanks(map)) => Some(map),
                    _ => None,
                };
                Widget::FillBlank {
                    template: template.clone(),
                    blanks: blanks
                        .iter()
                        .map(|b| BlankInput {
                            id: b.id.clone(),
                            value: filled
                                .and_then(|m| m.get(&b.id).cloned())
                                .unwrap_or_default(),
                        })
                        .collect(),
                }
            }
            QuestionKind::Unsupported => Widget::Unsupported {
                type_name: question.kind.type_name().to_string(),
            },
        };

        QuestionView {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            points: question.points,
            widget,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self.widget, Widget::Unsupported { .. })
    }
}

fn display_options(answers: &[AnswerOption]) -> Vec<&AnswerOption> {
    let mut options: Vec<&AnswerOption> = answers.iter().collect();
    options.sort_by_key(|a| a.order);
    options
}

/// Convert raw input into an answer for `question`.
///
/// Items may be referenced by id or by their 1-based position in the view:
/// - choice: `B` or `2`
/// - short answer: the text itself
/// - matching: `l1=r2, l2=r1` or `1=2, 2=1`
/// - ordering: `c, a, b` or `3, 1, 2`
/// - fill blank: one value per blank separated by `|`
pub fn parse_input(question: &Question, input: &str) -> Result<AnswerValue, QuizError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(invalid("answer cannot be empty"));
    }

    let view = QuestionView::build(question, None);
    match view.widget {
        Widget::Choices { options } => {
            let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
            resolve(&ids, input).map(|id| AnswerValue::Choice(id.to_string()))
        }
        Widget::TextInput { .. } => Ok(AnswerValue::Text(input.to_string())),
        Widget::Matching {
            rows,
            right_options,
        } => {
            let left_ids: Vec<&str> = rows.iter().map(|r| r.left_id.as_str()).collect();
            let right_ids: Vec<&str> = right_options.iter().map(|r| r.id.as_str()).collect();

            let mut map = BTreeMap::new();
            for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (left, right) = part
                    .split_once('=')
                    .ok_or_else(|| invalid(&format!("expected left=right, got '{}'", part)))?;
                let left = resolve(&left_ids, left.trim())?;
                let right = resolve(&right_ids, right.trim())?;
                map.insert(left.to_string(), right.to_string());
            }
            Ok(AnswerValue::Matching(map))
        }
        Widget::Ordering { items } => {
            let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
            let order = input
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| resolve(&ids, p).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AnswerValue::Ordering(order))
        }
        Widget::FillBlank { blanks, .. } => {
            let values: Vec<&str> = input.split('|').map(str::trim).collect();
            if values.len() != blanks.len() {
                return Err(invalid(&format!(
                    "expected {} value(s) separated by '|', got {}",
                    blanks.len(),
                    values.len()
                )));
            }
            Ok(AnswerValue::Blanks(
                blanks
                    .into_iter()
                    .zip(values)
                    .map(|(blank, value)| (blank.id, value.to_string()))
                    .collect(),
            ))
        }
        Widget::Unsupported { type_name } => Err(invalid(&format!(
            "questions of type '{}' cannot be answered here",
            type_name
        ))),
    }
}

/// Match a token against known ids, falling back to a 1-based position.
fn resolve<'a>(ids: &[&'a str], token: &str) -> Result<&'a str, QuizError> {
    if let Some(id) = ids.iter().find(|id| id.eq_ignore_ascii_case(token)) {
        return Ok(*id);
    }
    token
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| ids.get(i).copied())
        .ok_or_else(|| invalid(&format!("unknown option '{}'", token)))
}

fn invalid(message: &str) -> QuizError {
    QuizError::InvalidInput {
        message: message.to_string(),
    }
}
