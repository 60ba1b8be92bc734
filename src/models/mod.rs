mod evaluation;
mod question;

use std::fmt;

pub use evaluation::{EvaluationError, Response, answers_match};
pub use question::{
    Choice, FILL_BLANK_LABEL, MCQ_LABEL, OUTPUT_BASED_LABEL, Question, QuestionKind,
    TRUE_FALSE_LABEL,
};

/// Lifecycle status of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing requested yet.
    Idle,
    /// Questions are being fetched.
    Loading,
    /// Questions are being answered.
    InProgress,
    /// Every question has an answer.
    Finished,
    /// The last fetch failed.
    Failed,
}

impl SessionStatus {
    /// Whether a new start request is accepted in this status.
    pub fn accepts_start(self) -> bool {
        !matches!(self, SessionStatus::Loading)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Loading => "loading",
            SessionStatus::InProgress => "in progress",
            SessionStatus::Finished => "finished",
            SessionStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}
