//! Per-kind answer evaluation.

use thiserror::Error;

use super::question::{Question, QuestionKind};

/// What the user gave as an answer to the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Index into the options of a multiple choice question.
    Choice(usize),
    /// Free text for fill in the blank.
    Text(String),
    /// True/False pick.
    Bool(bool),
    /// Code or program output typed for an output based question.
    Output(String),
}

/// Why a response could not be turned into a verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// Output based answers have no automatic evaluator; the caller must judge.
    #[error("output based answers are not evaluated automatically")]
    NotImplemented,

    #[error("a {response} response cannot answer a {question} question")]
    KindMismatch {
        question: &'static str,
        response: &'static str,
    },

    #[error("option {index} does not exist (question has {available})")]
    OptionOutOfRange { index: usize, available: usize },
}

impl Response {
    fn label(&self) -> &'static str {
        match self {
            Response::Choice(_) => "choice",
            Response::Text(_) => "text",
            Response::Bool(_) => "true/false",
            Response::Output(_) => "output",
        }
    }
}

impl Question {
    /// Judge a response against this question.
    pub fn evaluate(&self, response: &Response) -> Result<bool, EvaluationError> {
        match (&self.kind, response) {
            (QuestionKind::MultipleChoice { options }, Response::Choice(index)) => options
                .get(*index)
                .map(|choice| choice.is_correct)
                .ok_or(EvaluationError::OptionOutOfRange {
                    index: *index,
                    available: options.len(),
                }),
            (QuestionKind::FillBlank { answer }, Response::Text(input)) => {
                Ok(answers_match(answer, input))
            }
            (QuestionKind::TrueFalse { answer }, Response::Bool(pick)) => Ok(answer == pick),
            (QuestionKind::OutputBased { .. }, _) => Err(EvaluationError::NotImplemented),
            (kind, response) => Err(EvaluationError::KindMismatch {
                question: kind.label(),
                response: response.label(),
            }),
        }
    }
}

/// Case-insensitive comparison of trimmed strings.
pub fn answers_match(expected: &str, input: &str) -> bool {
    expected.trim().to_lowercase() == input.trim().to_lowercase()
}
