use quiz_types::{AnswerOption, Question, QuestionKind, Quiz};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// `None` for problems with the quiz as a whole
    pub question_index: Option<usize>,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.question_index {
            Some(index) => write!(f, "question {}: {}", index + 1, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Checks a quiz definition the way the authoring form does before saving.
pub struct QuizValidator;

impl QuizValidator {
    pub fn validate(quiz: &Quiz) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if quiz.title.trim().is_empty() {
            issues.push(quiz_issue("title is required"));
        }
        if quiz.questions.is_empty() {
            issues.push(quiz_issue("quiz needs at least one question"));
        }
        if quiz.time_limit == Some(0) {
            issues.push(quiz_issue("time limit must be positive when set"));
        }

        let mut seen_ids = HashSet::new();
        for (index, question) in quiz.questions.iter().enumerate() {
            if !seen_ids.insert(question.id.as_str()) {
                issues.push(question_issue(index, "duplicate question id"));
            }
            Self::validate_question(index, question, &mut issues);
        }

        issues
    }

    pub fn is_playable(quiz: &Quiz) -> bool {
        Self::validate(quiz).is_empty()
    }

    fn validate_question(index: usize, question: &Question, issues: &mut Vec<ValidationIssue>) {
        let mut push = |message: &str| issues.push(question_issue(index, message));

        if question.prompt.trim().is_empty() {
            push("prompt is required");
        }
        if question.points == 0 {
            push("points must be positive");
        }

        match &question.kind {
            QuestionKind::SingleChoice { answers } => {
                if answers.len() < 2 {
                    push("needs at least two answers");
                }
                if correct_count(answers) != 1 {
                    push("needs exactly one correct answer");
                }
            }
            QuestionKind::TrueFalse { answers } => {
                if answers.len() != 2 {
                    push("needs exactly two answers");
                }
                if correct_count(answers) != 1 {
                    push("needs exactly one correct answer");
                }
            }
            QuestionKind::ShortAnswer { answers } => {
                if !answers
                    .iter()
                    .any(|a| a.is_correct && !a.text.trim().is_empty())
                {
                    push("needs at least one accepted answer");
                }
            }
            QuestionKind::Matching { pairs } => {
                if pairs.is_empty() {
                    push("needs at least one pair");
                }
                let lefts: HashSet<&str> = pairs.iter().map(|p| p.left_id.as_str()).collect();
                let rights: HashSet<&str> = pairs.iter().map(|p| p.right_id.as_str()).collect();
                if lefts.len() != pairs.len() || rights.len() != pairs.len() {
                    push("pair ids must be unique");
                }
            }
            QuestionKind::Ordering { items } => {
                if items.len() < 2 {
                    push("needs at least two items");
                }
                let orders: HashSet<u32> = items.iter().map(|i| i.order).collect();
                if orders.len() != items.len() {
                    push("order indices must be unique");
                }
            }
            QuestionKind::FillBlank { blanks, .. } => {
                if blanks.is_empty() {
                    push("needs at least one blank");
                }
                if blanks.iter().any(|b| b.correct.trim().is_empty()) {
                    push("every blank needs a correct value");
                }
            }
            QuestionKind::Unsupported => push("question type is not supported"),
        }
    }
}

fn correct_count(answers: &[AnswerOption]) -> usize {
    answers.iter().filter(|a| a.is_correct).count()
}

fn quiz_issue(message: &str) -> ValidationIssue {
    ValidationIssue {
        question_index: None,
        message: message.to_string(),
    }
}

fn question_issue(index: usize, message: &str) -> ValidationIssue {
    ValidationIssue {
        question_index: Some(index),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_types::{Blank, Difficulty, OrderItem};

    fn answer(id: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id: id.to_string(),
            text: format!("answer {}", id),
            is_correct,
            order: 0,
        }
    }

    fn quiz_with(kind: QuestionKind) -> Quiz {
        Quiz {
            id: "1".to_string(),
            title: "Colours".to_string(),
            description: String::new(),
            category: "vocabulary".to_string(),
            difficulty: Difficulty::Intermediate,
            time_limit: Some(5),
            is_public: false,
            questions: vec![Question {
                id: "q1".to_string(),
                prompt: "Red in Spanish?".to_string(),
                points: 1,
                kind,
            }],
        }
    }

    #[test]
    fn test_valid_single_choice_quiz() {
        let quiz = quiz_with(QuestionKind::SingleChoice {
            answers: vec![answer("a", true), answer("b", false)],
        });
        assert!(QuizValidator::is_playable(&quiz));
    }

    #[test]
    fn test_quiz_level_issues() {
        let mut quiz = quiz_with(QuestionKind::Unsupported);
        quiz.title = "  ".to_string();
        quiz.questions.clear();
        quiz.time_limit = Some(0);

        let issues = QuizValidator::validate(&quiz);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.question_index.is_none()));
    }

    #[test]
    fn test_true_false_shape() {
        let quiz = quiz_with(QuestionKind::TrueFalse {
            answers: vec![answer("t", true), answer("f", true), answer("x", false)],
        });
        let issues = QuizValidator::validate(&quiz);
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["needs exactly two answers", "needs exactly one correct answer"]
        );
        assert_eq!(
            issues[0].to_string(),
            "question 1: needs exactly two answers"
        );
    }

    #[test]
    fn test_ordering_and_blank_rules() {
        let quiz = quiz_with(QuestionKind::Ordering {
            items: vec![
                OrderItem {
                    id: "a".to_string(),
                    text: "un".to_string(),
                    order: 1,
                },
                OrderItem {
                    id: "b".to_string(),
                    text: "deux".to_string(),
                    order: 1,
                },
            ],
        });
        assert_eq!(QuizValidator::validate(&quiz).len(), 1);

        let quiz = quiz_with(QuestionKind::FillBlank {
            template: None,
            blanks: vec![Blank {
                id: "b1".to_string(),
                correct: " ".to_string(),
                alternatives: vec!["rojo".to_string()],
            }],
        });
        assert_eq!(
            QuizValidator::validate(&quiz)[0].message,
            "every blank needs a correct value"
        );
    }

    #[test]
    fn test_duplicate_question_ids() {
        let mut quiz = quiz_with(QuestionKind::ShortAnswer {
            answers: vec![answer("a", true)],
        });
        quiz.questions.push(quiz.questions[0].clone());

        let issues = QuizValidator::validate(&quiz);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].question_index, Some(1));
    }
}
