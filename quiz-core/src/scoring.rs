use quiz_types::{
    AnswerMap, AnswerOption, AnswerValue, Blank, MatchPair, OrderItem, Question, QuestionKind,
    QuestionResult, QuizResult,
};
use std::collections::BTreeMap;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Score every question against the captured answers.
    ///
    /// Pure and deterministic: the same inputs always produce an identical result.
    pub fn score(questions: &[Question], answers: &AnswerMap) -> QuizResult {
        let mut correct_answers = 0;
        let mut earned_points = 0;
        let mut total_points = 0;
        let mut breakdown = Vec::with_capacity(questions.len());

        for (index, question) in questions.iter().enumerate() {
            let user_answer = answers.get(&index);
            let is_correct = user_answer
                .map(|answer| Self::is_correct(question, answer))
                .unwrap_or(false);
            let points_earned = if is_correct { question.points } else { 0 };

            // Point values come from the backend unchecked
            total_points = u32::saturating_add(total_points, question.points);
            if is_correct {
                correct_answers += 1;
                earned_points = u32::saturating_add(earned_points, points_earned);
            }

            breakdown.push(QuestionResult {
                index,
                question_id: question.id.clone(),
                user_answer: user_answer.cloned(),
                is_correct,
                points_earned,
            });
        }

        QuizResult {
            correct_answers,
            total_questions: questions.len() as u32,
            earned_points,
            total_points,
            percentage: Self::percentage(earned_points, total_points),
            breakdown,
        }
    }

    /// `round(earned / total * 100)`, defined as 0 when there are no points to earn
    pub fn percentage(earned: u32, total: u32) -> u8 {
        if total == 0 {
            return 0;
        }
        let earned = u64::from(earned.min(total));
        let total = u64::from(total);
        // Integer round-half-up of earned * 100 / total
        ((earned * 200 + total) / (2 * total)) as u8
    }

    /// Apply the correctness rule for the question's kind.
    pub fn is_correct(question: &Question, answer: &AnswerValue) -> bool {
        if answer.is_empty() {
            return false;
        }

        match (&question.kind, answer) {
            (QuestionKind::SingleChoice { answers }, AnswerValue::Choice(id))
            | (QuestionKind::TrueFalse { answers }, AnswerValue::Choice(id)) => {
                Self::check_choice(answers, id)
            }
            (QuestionKind::ShortAnswer { answers }, AnswerValue::Text(text)) => {
                Self::check_short_answer(answers, text)
            }
            (QuestionKind::Matching { pairs }, AnswerValue::Matching(selected)) => {
                Self::check_matching(pairs, selected)
            }
            (QuestionKind::Ordering { items }, AnswerValue::Ordering(order)) => {
                Self::check_ordering(items, order)
            }
            (QuestionKind::FillBlank { blanks, .. }, AnswerValue::Blanks(filled)) => {
                Self::check_blanks(blanks, filled)
            }
            // Wrong shape for the kind, or a kind we cannot score
            _ => false,
        }
    }

    fn check_choice(answers: &[AnswerOption], selected: &str) -> bool {
        let mut correct = answers.iter().filter(|a| a.is_correct);
        match (correct.next(), correct.next()) {
            (Some(only), None) => only.id == selected,
            _ => false,
        }
    }

    fn check_short_answer(answers: &[AnswerOption], text: &str) -> bool {
        let given = normalize(text);
        answers
            .iter()
            .filter(|a| a.is_correct)
            .any(|a| normalize(&a.text) == given)
    }

    fn check_matching(pairs: &[MatchPair], selected: &BTreeMap<String, String>) -> bool {
        !pairs.is_empty()
            && pairs
                .iter()
                .all(|pair| selected.get(&pair.left_id) == Some(&pair.right_id))
    }

    fn check_ordering(items: &[OrderItem], order: &[String]) -> bool {
        Self::canonical_order(items)
            .iter()
            .map(|item| &item.id)
            .eq(order.iter())
    }

    fn check_blanks(blanks: &[Blank], filled: &BTreeMap<String, String>) -> bool {
        !blanks.is_empty()
            && blanks.iter().all(|blank| {
                filled.get(&blank.id).is_some_and(|text| {
                    let given = normalize(text);
                    !given.is_empty()
                        && std::iter::once(&blank.correct)
                            .chain(blank.alternatives.iter())
                            .any(|accepted| normalize(accepted) == given)
                })
            })
    }

    /// Items sorted by their order index; ties keep definition order.
    pub fn canonical_order(items: &[OrderItem]) -> Vec<&OrderItem> {
        let mut sorted: Vec<&OrderItem> = items.iter().collect();
        sorted.sort_by_key(|item| item.order);
        sorted
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
