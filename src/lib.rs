//! # codedrill
//!
//! A terminal practice quiz whose questions are generated by an AI text
//! provider for a topic of your choice.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use codedrill::{FileGenerator, QuestionSource, QuestionSourceConfig, QuizSession};
//!
//! # async fn demo() -> Result<(), codedrill::SessionError> {
//! let generator = Arc::new(FileGenerator::new("saved-response.json"));
//! let source = QuestionSource::new(generator, QuestionSourceConfig::default());
//!
//! let mut session = QuizSession::new();
//! session.start(&source, "Rust ownership").await?;
//! while session.current_question().is_some() {
//!     session.submit_answer(true)?;
//! }
//! println!("{}/{}", session.score(), session.total_questions());
//! # Ok(())
//! # }
//! ```

mod app;
mod generator;
mod models;
mod session;
mod source;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use app::{Action, App};
pub use generator::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, FileGenerator, GeminiConfig, GeminiGenerator, GenerateError,
    TextGenerator,
};
pub use models::{
    Choice, EvaluationError, Question, QuestionKind, Response, SessionStatus, answers_match,
};
pub use session::{LoadTicket, Progress, QuizSession, SessionError};
pub use source::{
    DEFAULT_DIFFICULTY, DEFAULT_QUESTION_COUNT, FetchError, QuestionDefect, QuestionSource,
    QuestionSourceConfig, build_prompt, parse_questions, validate_questions,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Top level error for running the application.
#[derive(Error, Debug)]
pub enum CodeDrillError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to set up question provider: {0}")]
    Generator(#[from] GenerateError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

type LoadResult = (LoadTicket, Result<Vec<Question>, FetchError>);

/// Run the quiz in the terminal until the user quits.
///
/// `initial_topic` pre-fills the topic prompt.
pub async fn run(source: QuestionSource, initial_topic: Option<String>) -> Result<(), CodeDrillError> {
    let mut guard = terminal::TerminalGuard::enter()?;
    let mut app = App::new(initial_topic);
    run_event_loop(guard.terminal(), &mut app, &source).await
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    source: &QuestionSource,
) -> Result<(), CodeDrillError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<LoadResult>();
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        while let Ok((ticket, result)) = rx.try_recv() {
            app.finish_loading(ticket, result);
            in_flight = None;
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            break;
        }

        match app.handle_key(key.code) {
            Action::None => {}
            Action::Quit => break,
            Action::Fetch(ticket) => {
                in_flight = Some(spawn_fetch(source.clone(), ticket, tx.clone()));
            }
        }
    }

    if let Some(handle) = in_flight {
        tracing::info!("aborting in-flight fetch");
        handle.abort();
    }

    Ok(())
}

fn spawn_fetch(
    source: QuestionSource,
    ticket: LoadTicket,
    tx: mpsc::UnboundedSender<LoadResult>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = source.fetch(ticket.topic()).await;
        if tx.send((ticket, result)).is_err() {
            tracing::debug!("event loop gone, dropping fetch result");
        }
    })
}
