use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{AnswerValue, CompleteSessionResponse, QuestionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionResult {
    pub index: usize,
    pub question_id: QuestionId,
    pub user_answer: Option<AnswerValue>,
    pub is_correct: bool,
    pub points_earned: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuizResult {
    pub correct_answers: u32,
    pub total_questions: u32,
    pub earned_points: u32,
    pub total_points: u32,
    /// Always within 0..=100
    pub percentage: u8,
    pub breakdown: Vec<QuestionResult>,
}

impl QuizResult {
    /// Overlay whatever the backend reported on top of the locally computed result.
    ///
    /// Fields are taken one by one, so a partial response yields a mix of
    /// remote and local values. The breakdown always stays local.
    pub fn merge_remote(mut self, remote: &CompleteSessionResponse) -> Self {
        if let Some(correct) = remote.correct_answers {
            self.correct_answers = correct;
        }
        if let Some(total) = remote.total_questions {
            self.total_questions = total;
        }
        if let Some(earned) = remote.earned_points {
            self.earned_points = earned;
        }
        if let Some(total) = remote.total_points {
            self.total_points = total;
        }
        if let Some(percentage) = remote.percentage {
            self.percentage = percentage.min(100);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_result() -> QuizResult {
        QuizResult {
            correct_answers: 1,
            total_questions: 2,
            earned_points: 1,
            total_points: 2,
            percentage: 50,
            breakdown: vec![],
        }
    }

    #[test]
    fn test_merge_full_remote_result() {
        let remote = CompleteSessionResponse {
            correct_answers: Some(2),
            total_questions: Some(2),
            earned_points: Some(2),
            total_points: Some(2),
            percentage: Some(100),
        };

        let merged = local_result().merge_remote(&remote);
        assert_eq!(merged.correct_answers, 2);
        assert_eq!(merged.percentage, 100);
    }

    #[test]
    fn test_merge_partial_remote_result_keeps_local_fields() {
        let remote = CompleteSessionResponse {
            percentage: Some(75),
            ..Default::default()
        };

        let merged = local_result().merge_remote(&remote);
        assert_eq!(merged.percentage, 75);
        assert_eq!(merged.earned_points, 1);
        assert_eq!(merged.total_points, 2);
    }

    #[test]
    fn test_merge_clamps_percentage() {
        let remote = CompleteSessionResponse {
            percentage: Some(180),
            ..Default::default()
        };
        assert_eq!(local_result().merge_remote(&remote).percentage, 100);
    }
}
