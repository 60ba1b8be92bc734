//! Quiz session state machine.
//!
//! A [`QuizSession`] owns one quiz run at a time: the topic, the fetched
//! questions, the current position and the score. All state lives in a single
//! private [`Phase`] so that the status can never disagree with the data.
//!
//! Fetching is split into [`QuizSession::begin`] and [`QuizSession::complete`]
//! so a UI can render the `Loading` status while the request runs elsewhere.
//! [`QuizSession::start`] does both in one call.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{EvaluationError, Question, Response, SessionStatus};
use crate::source::{FetchError, QuestionSource, validate_questions};

/// Errors raised by session transitions.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("cannot {operation} while the session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    #[error("fetch result does not belong to the current run")]
    StaleLoad,

    #[error(transparent)]
    Fetch(Arc<FetchError>),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Handed out by [`QuizSession::begin`]; proves a fetch result belongs to the
/// run that requested it.
#[derive(Debug)]
#[must_use = "a load ticket must be passed back to QuizSession::complete"]
pub struct LoadTicket {
    run_id: Uuid,
    topic: String,
}

impl LoadTicket {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Outcome of a recorded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved on to the question at `position`.
    Next { position: usize },
    /// That was the last question.
    Finished { score: usize, total: usize },
}

#[derive(Debug)]
struct Run {
    topic: String,
    questions: Vec<Question>,
    position: usize,
    score: usize,
    verdicts: Vec<bool>,
}

impl Run {
    fn new(topic: String, questions: Vec<Question>) -> Self {
        let total = questions.len();
        Self {
            topic,
            questions,
            position: 0,
            score: 0,
            verdicts: Vec::with_capacity(total),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Loading { topic: String },
    InProgress(Run),
    Finished(Run),
    Failed { topic: String, error: Arc<FetchError> },
}

/// One owned quiz session.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    phase: Phase,
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Idle,
        }
    }

    /// Identifier of the current run. Changes on every accepted start.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::Idle => SessionStatus::Idle,
            Phase::Loading { .. } => SessionStatus::Loading,
            Phase::InProgress(_) => SessionStatus::InProgress,
            Phase::Finished(_) => SessionStatus::Finished,
            Phase::Failed { .. } => SessionStatus::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status() == SessionStatus::Loading
    }

    pub fn is_finished(&self) -> bool {
        self.status() == SessionStatus::Finished
    }

    /// Topic of the current run, if one was started.
    pub fn topic(&self) -> Option<&str> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Loading { topic } | Phase::Failed { topic, .. } => Some(topic.as_str()),
            Phase::InProgress(run) | Phase::Finished(run) => Some(run.topic.as_str()),
        }
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::InProgress(run) => run.questions.get(run.position),
            _ => None,
        }
    }

    pub fn position(&self) -> usize {
        self.run().map_or(0, |run| run.position)
    }

    pub fn total_questions(&self) -> usize {
        self.run().map_or(0, |run| run.questions.len())
    }

    pub fn score(&self) -> usize {
        self.run().map_or(0, |run| run.score)
    }

    pub fn questions(&self) -> &[Question] {
        self.run()
            .map(|run| run.questions.as_slice())
            .unwrap_or_default()
    }

    /// Evaluations recorded so far, in question order.
    pub fn verdicts(&self) -> &[bool] {
        self.run()
            .map(|run| run.verdicts.as_slice())
            .unwrap_or_default()
    }

    /// The error of the last failed fetch.
    pub fn error(&self) -> Option<&FetchError> {
        match &self.phase {
            Phase::Failed { error, .. } => Some(error.as_ref()),
            _ => None,
        }
    }

    fn run(&self) -> Option<&Run> {
        match &self.phase {
            Phase::InProgress(run) | Phase::Finished(run) => Some(run),
            _ => None,
        }
    }

    /// Enter `Loading` for `topic`, discarding any previous run.
    ///
    /// A blank topic is rejected without touching the state, and so is a
    /// second start while a fetch is outstanding.
    pub fn begin(&mut self, topic: &str) -> Result<LoadTicket, SessionError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(SessionError::EmptyTopic);
        }

        let status = self.status();
        if !status.accepts_start() {
            return Err(SessionError::InvalidState {
                operation: "start",
                status,
            });
        }

        self.id = Uuid::new_v4();
        self.phase = Phase::Loading {
            topic: topic.to_string(),
        };
        tracing::info!(run = %self.id, topic, "loading questions");

        Ok(LoadTicket {
            run_id: self.id,
            topic: topic.to_string(),
        })
    }

    /// Deliver the fetch result for `ticket`.
    ///
    /// On failure the session moves to `Failed`, keeps the error for display
    /// and returns it as [`SessionError::Fetch`].
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Question>, FetchError>,
    ) -> Result<(), SessionError> {
        if ticket.run_id != self.id || !self.is_loading() {
            tracing::error!(run = %self.id, ticket = %ticket.run_id, "dropping stale fetch result");
            return Err(SessionError::StaleLoad);
        }

        let result = result.and_then(|questions| {
            validate_questions(&questions)?;
            Ok(questions)
        });

        match result {
            Ok(questions) => {
                tracing::info!(run = %self.id, topic = %ticket.topic, total = questions.len(), "quiz started");
                self.phase = Phase::InProgress(Run::new(ticket.topic, questions));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(run = %self.id, topic = %ticket.topic, error = %err, "fetch failed");
                let error = Arc::new(err);
                self.phase = Phase::Failed {
                    topic: ticket.topic,
                    error: Arc::clone(&error),
                };
                Err(SessionError::Fetch(error))
            }
        }
    }

    /// Start a run for `topic` and wait for its questions.
    pub async fn start(&mut self, source: &QuestionSource, topic: &str) -> Result<(), SessionError> {
        let ticket = self.begin(topic)?;
        let result = source.fetch(ticket.topic()).await;
        self.complete(ticket, result)
    }

    /// Record the evaluation of the current question and advance.
    pub fn submit_answer(&mut self, evaluated: bool) -> Result<Progress, SessionError> {
        let status = self.status();
        let Phase::InProgress(run) = &mut self.phase else {
            return Err(SessionError::InvalidState {
                operation: "submit an answer",
                status,
            });
        };

        run.verdicts.push(evaluated);
        if evaluated {
            run.score += 1;
        }

        if run.position + 1 < run.questions.len() {
            run.position += 1;
            tracing::debug!(run = %self.id, position = run.position, score = run.score, "answer recorded");
            return Ok(Progress::Next {
                position: run.position,
            });
        }

        let score = run.score;
        let total = run.questions.len();
        if let Phase::InProgress(run) = std::mem::replace(&mut self.phase, Phase::Idle) {
            self.phase = Phase::Finished(run);
        }
        tracing::info!(run = %self.id, score, total, "quiz finished");

        Ok(Progress::Finished { score, total })
    }

    /// Evaluate `response` against the current question and record it.
    ///
    /// Output based questions fail with [`EvaluationError::NotImplemented`];
    /// the caller has to judge those and use [`QuizSession::submit_answer`].
    pub fn answer(&mut self, response: &Response) -> Result<Progress, SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::InvalidState {
                operation: "answer",
                status: self.status(),
            })?;
        let evaluated = question.evaluate(response)?;
        self.submit_answer(evaluated)
    }

    /// Drop the current run and go back to `Idle`.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let status = self.status();
        if !status.accepts_start() {
            return Err(SessionError::InvalidState {
                operation: "reset",
                status,
            });
        }
        self.phase = Phase::Idle;
        Ok(())
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}
