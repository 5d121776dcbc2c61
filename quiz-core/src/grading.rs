use quiz_types::QuizResult;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub fn from_percentage(percentage: u8) -> Self {
        match tier(percentage) {
            5 => LetterGrade::APlus,
            4 => LetterGrade::A,
            3 => LetterGrade::B,
            2 => LetterGrade::C,
            1 => LetterGrade::D,
            _ => LetterGrade::F,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        write!(f, "{}", label)
    }
}

const ENCOURAGEMENTS: [&str; 6] = [
    "Don't give up! Review the material and try again.",
    "You're getting there. A little more practice will help.",
    "Not bad! Keep practicing to improve.",
    "Good job! You have a solid understanding.",
    "Great work! You really know this material.",
    "Outstanding! You've mastered this quiz!",
];

/// Breakpoints 90/80/70/60/50 mapped to tiers 5..=1, everything below is 0
fn tier(percentage: u8) -> usize {
    match percentage {
        90.. => 5,
        80..=89 => 4,
        70..=79 => 3,
        60..=69 => 2,
        50..=59 => 1,
        _ => 0,
    }
}

pub fn star_count(percentage: u8) -> u8 {
    tier(percentage) as u8
}

pub fn encouragement(percentage: u8) -> &'static str {
    ENCOURAGEMENTS[tier(percentage)]
}

/// What the results screen shows for a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub grade: LetterGrade,
    pub stars: u8,
    pub message: String,
    pub percentage: u8,
    pub correct_answers: u32,
    pub total_questions: u32,
}

impl From<&QuizResult> for ResultSummary {
    fn from(result: &QuizResult) -> Self {
        ResultSummary {
            grade: LetterGrade::from_percentage(result.percentage),
            stars: star_count(result.percentage),
            message: encouragement(result.percentage).to_string(),
            percentage: result.percentage,
            correct_answers: result.correct_answers,
            total_questions: result.total_questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_breakpoints() {
        let cases = [
            (100, LetterGrade::APlus),
            (90, LetterGrade::APlus),
            (89, LetterGrade::A),
            (80, LetterGrade::A),
            (79, LetterGrade::B),
            (70, LetterGrade::B),
            (60, LetterGrade::C),
            (59, LetterGrade::D),
            (50, LetterGrade::D),
            (49, LetterGrade::F),
            (0, LetterGrade::F),
        ];
        for (percentage, grade) in cases {
            assert_eq!(
                LetterGrade::from_percentage(percentage),
                grade,
                "percentage {}",
                percentage
            );
        }
    }

    #[test]
    fn test_stars_and_messages_follow_tiers() {
        assert_eq!(star_count(95), 5);
        assert_eq!(star_count(85), 4);
        assert_eq!(star_count(50), 1);
        assert_eq!(star_count(10), 0);
        assert_eq!(encouragement(100), "Outstanding! You've mastered this quiz!");
        assert_eq!(
            encouragement(0),
            "Don't give up! Review the material and try again."
        );
        assert_ne!(encouragement(65), encouragement(75));
    }

    #[test]
    fn test_display() {
        assert_eq!(LetterGrade::APlus.to_string(), "A+");
        assert_eq!(LetterGrade::F.to_string(), "F");
    }

    #[test]
    fn test_summary_from_result() {
        let result = QuizResult {
            correct_answers: 1,
            total_questions: 2,
            earned_points: 1,
            total_points: 2,
            percentage: 50,
            breakdown: vec![],
        };
        let summary = ResultSummary::from(&result);
        assert_eq!(summary.grade, LetterGrade::D);
        assert_eq!(summary.stars, 1);
        assert_eq!(summary.correct_answers, 1);
    }
}
