use quiz_core::{
    AttemptEvent, AttemptEventHandler, QuestionView, ResultSummary, Widget, format_clock,
};
use quiz_types::{AnswerMap, Quiz, QuizResult};
use std::sync::Arc;

use crate::player::PlayerCommand;

pub const HELP: &str = "\
Commands:
  <answer>      answer the current question
  =<answer>     answer with text that matches a command, e.g. =next
  next | n      go to the next question (finishes on the last one)
  prev | p      go to the previous question
  goto <n>      jump to question n
  submit        finish the quiz now
  start         start the timer when it does not start on its own
  pause/resume  pause or resume the timer
  retry         retry starting the session
  help          show this help
  quit          leave without finishing";

#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    Player(PlayerCommand),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<TerminalCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(literal) = line.strip_prefix('=') {
        let literal = literal.trim();
        return (!literal.is_empty())
            .then(|| TerminalCommand::Player(PlayerCommand::Input(literal.to_string())));
    }

    let lowered = line.to_lowercase();
    let command = match lowered.as_str() {
        "next" | "n" => TerminalCommand::Player(PlayerCommand::Advance),
        "prev" | "p" => TerminalCommand::Player(PlayerCommand::Retreat),
        "submit" | "finish" => TerminalCommand::Player(PlayerCommand::Complete),
        "start" => TerminalCommand::Player(PlayerCommand::StartTimer),
        "pause" => TerminalCommand::Player(PlayerCommand::PauseTimer),
        "resume" => TerminalCommand::Player(PlayerCommand::ResumeTimer),
        "retry" => TerminalCommand::Player(PlayerCommand::Retry),
        "help" | "?" => TerminalCommand::Help,
        "quit" | "exit" => TerminalCommand::Quit,
        other => match other
            .strip_prefix("goto ")
            .and_then(|n| n.trim().parse::<usize>().ok())
        {
            Some(n) if n > 0 => TerminalCommand::Player(PlayerCommand::GoTo(n - 1)),
            _ => TerminalCommand::Player(PlayerCommand::Input(line.to_string())),
        },
    };
    Some(command)
}

pub fn render_question(view: &QuestionView, index: usize, total: usize) -> String {
    let mut out = format!(
        "\nQuestion {}/{} ({} pt{})\n{}\n",
        index + 1,
        total,
        view.points,
        if view.points == 1 { "" } else { "s" },
        view.prompt
    );

    match &view.widget {
        Widget::Choices { options } => {
            for (i, option) in options.iter().enumerate() {
                let marker = if option.selected { "x" } else { " " };
                out.push_str(&format!("  [{}] {}. {}\n", marker, i + 1, option.text));
            }
        }
        Widget::TextInput { value } => {
            if value.is_empty() {
                out.push_str("  Type your answer\n");
            } else {
                out.push_str(&format!("  Current answer: {}\n", value));
            }
        }
        Widget::Matching {
            rows,
            right_options,
        } => {
            for (i, row) in rows.iter().enumerate() {
                let chosen = row
                    .selected_right
                    .as_ref()
                    .and_then(|id| right_options.iter().find(|r| &r.id == id))
                    .map(|r| r.text.as_str())
                    .unwrap_or("?");
                out.push_str(&format!("  {}. {} -> {}\n", i + 1, row.left, chosen));
            }
            out.push_str("  Options:\n");
            for (i, right) in right_options.iter().enumerate() {
                out.push_str(&format!("    {}. {}\n", i + 1, right.text));
            }
            out.push_str("  Answer as 1=2, 2=1\n");
        }
        Widget::Ordering { items } => {
            for (i, item) in items.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, item.text));
            }
            out.push_str("  Answer with the numbers in the right order, e.g. 2, 1, 3\n");
        }
        Widget::FillBlank { template, blanks } => {
            if let Some(template) = template {
                out.push_str(&format!("  {}\n", template));
            }
            let filled: Vec<&str> = blanks.iter().map(|b| b.value.as_str()).collect();
            if filled.iter().any(|v| !v.is_empty()) {
                out.push_str(&format!("  Current: {}\n", filled.join(" | ")));
            }
            out.push_str(&format!(
                "  Fill {} blank(s), separated by '|'\n",
                blanks.len()
            ));
        }
        Widget::Unsupported { type_name } => {
            out.push_str(&format!(
                "  This question type ({}) is not supported here. Use 'next' to skip it.\n",
                type_name
            ));
        }
    }

    out
}

pub fn render_result(result: &QuizResult) -> String {
    let summary = ResultSummary::from(result);
    let stars: String = (0..5)
        .map(|i| if i < summary.stars { '*' } else { '.' })
        .collect();

    let mut out = format!(
        "\nQuiz complete!\n  Grade: {}  [{}]\n  {}/{} correct, {}/{} points ({}%)\n  {}\n",
        summary.grade,
        stars,
        result.correct_answers,
        result.total_questions,
        result.earned_points,
        result.total_points,
        result.percentage,
        summary.message
    );
    for question in &result.breakdown {
        out.push_str(&format!(
            "  {} Question {} ({} pt)\n",
            if question.is_correct { "+" } else { "-" },
            question.index + 1,
            question.points_earned
        ));
    }
    out
}

/// Prints the attempt to stdout as events arrive.
pub struct TerminalView {
    quiz: Arc<Quiz>,
    answers: AnswerMap,
    cursor: usize,
}

impl TerminalView {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        Self {
            quiz,
            answers: AnswerMap::new(),
            cursor: 0,
        }
    }

    fn current_question(&self) -> Option<String> {
        let question = self.quiz.questions.get(self.cursor)?;
        let view = QuestionView::build(question, self.answers.get(&self.cursor));
        Some(render_question(&view, self.cursor, self.quiz.questions.len()))
    }
}

impl AttemptEventHandler for TerminalView {
    fn handle_event(&mut self, event: AttemptEvent) {
        match event {
            AttemptEvent::SessionStarted { .. } => {
                println!("{}", self.quiz.title);
                if let Some(seconds) = self.quiz.time_limit_seconds() {
                    println!("Time limit: {}", format_clock(seconds));
                }
            }
            AttemptEvent::SessionFailed { message, .. } => {
                println!("Could not start the quiz: {}", message);
                println!("Type 'retry' to try again.");
            }
            AttemptEvent::CursorMoved { index, .. } => {
                self.cursor = index;
                if let Some(text) = self.current_question() {
                    print!("{}", text);
                }
            }
            AttemptEvent::AnswerRecorded { index, value, .. } => {
                self.answers.insert(index, value);
                println!("Saved. Type 'next' to continue.");
            }
            AttemptEvent::TimerWarning {
                seconds_remaining, ..
            } => {
                println!("{} left!", format_clock(seconds_remaining));
            }
            AttemptEvent::TimerExpired { .. } => {
                println!("Time's up!");
            }
            AttemptEvent::Completed {
                result,
                confirmed_by_backend,
                ..
            } => {
                print!("{}", render_result(&result));
                if !confirmed_by_backend {
                    println!("  (score computed offline)");
                }
            }
        }
    }
}
