use crossterm::event::KeyCode;

use crate::models::{EvaluationError, Question, QuestionKind, Response, SessionStatus};
use crate::session::{LoadTicket, QuizSession, SessionError};
use crate::source::FetchError;

const TRUE_FALSE_OPTIONS: usize = 2;
const MAX_TOPIC_LENGTH: usize = 80;

/// What the event loop has to do after a key press.
#[derive(Debug)]
pub enum Action {
    None,
    Quit,
    /// Run the fetch for this ticket and hand the result to [`App::finish_loading`].
    Fetch(LoadTicket),
}

pub struct App {
    session: QuizSession,
    topic_input: String,
    notice: Option<String>,
    selected_option: usize,
    answer_input: String,
    revealed: bool,
    result_scroll: usize,
}

impl App {
    pub fn new(initial_topic: Option<String>) -> Self {
        Self {
            session: QuizSession::new(),
            topic_input: initial_topic.unwrap_or_default(),
            notice: None,
            selected_option: 0,
            answer_input: String::new(),
            revealed: false,
            result_scroll: 0,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn topic_input(&self) -> &str {
        &self.topic_input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn answer_input(&self) -> &str {
        &self.answer_input
    }

    /// Whether the expected output is shown and a self-grade is awaited.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn current_question_number(&self) -> usize {
        self.session.position() + 1
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match self.session.status() {
            SessionStatus::Idle => self.handle_topic_key(key),
            SessionStatus::Loading => match key {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
                _ => Action::None,
            },
            SessionStatus::InProgress => self.handle_quiz_key(key),
            SessionStatus::Finished | SessionStatus::Failed => self.handle_summary_key(key),
        }
    }

    /// Feed a finished fetch back into the session.
    pub fn finish_loading(&mut self, ticket: LoadTicket, result: Result<Vec<Question>, FetchError>) {
        match self.session.complete(ticket, result) {
            Ok(()) | Err(SessionError::Fetch(_)) => self.clear_question_state(),
            Err(err) => tracing::error!(error = %err, "ignoring fetch result"),
        }
    }

    fn start(&mut self, topic: String) -> Action {
        match self.session.begin(&topic) {
            Ok(ticket) => {
                self.notice = None;
                self.result_scroll = 0;
                Action::Fetch(ticket)
            }
            Err(SessionError::EmptyTopic) => {
                self.notice = Some("Enter a topic first".to_string());
                Action::None
            }
            Err(err) => {
                tracing::error!(error = %err, "start rejected");
                Action::None
            }
        }
    }

    fn handle_topic_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Enter => self.start(self.topic_input.clone()),
            KeyCode::Esc => Action::Quit,
            KeyCode::Backspace => {
                self.notice = None;
                self.topic_input.pop();
                Action::None
            }
            KeyCode::Char(c) => {
                self.notice = None;
                if self.topic_input.chars().count() < MAX_TOPIC_LENGTH {
                    self.topic_input.push(c);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_quiz_key(&mut self, key: KeyCode) -> Action {
        let Some(question) = self.session.current_question() else {
            return Action::None;
        };

        match &question.kind {
            QuestionKind::MultipleChoice { options } => {
                let count = options.len();
                self.handle_choice_key(key, count, Response::Choice)
            }
            QuestionKind::TrueFalse { .. } => {
                self.handle_choice_key(key, TRUE_FALSE_OPTIONS, |index| Response::Bool(index == 0))
            }
            QuestionKind::FillBlank { .. } => {
                self.handle_text_key(key, |input| Response::Text(input.to_string()))
            }
            QuestionKind::OutputBased { .. } if self.revealed => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.record(true),
                KeyCode::Char('n') | KeyCode::Char('N') => self.record(false),
                KeyCode::Esc => Action::Quit,
                _ => Action::None,
            },
            QuestionKind::OutputBased { .. } => {
                self.handle_text_key(key, |input| Response::Output(input.to_string()))
            }
        }
    }

    fn handle_choice_key(
        &mut self,
        key: KeyCode,
        count: usize,
        response: impl Fn(usize) -> Response,
    ) -> Action {
        if count == 0 {
            return match key {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
                _ => Action::None,
            };
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_option = (self.selected_option + count - 1) % count;
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_option = (self.selected_option + 1) % count;
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.answer(&response(self.selected_option)),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn handle_text_key(&mut self, key: KeyCode, response: impl Fn(&str) -> Response) -> Action {
        match key {
            KeyCode::Enter => {
                let response = response(&self.answer_input);
                self.answer(&response)
            }
            KeyCode::Backspace => {
                self.answer_input.pop();
                Action::None
            }
            KeyCode::Char(c) => {
                self.answer_input.push(c);
                Action::None
            }
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn handle_summary_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                let max_scroll = self.session.total_questions().saturating_sub(1);
                self.result_scroll = (self.result_scroll + 1).min(max_scroll);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let topic = self.session.topic().unwrap_or_default().to_string();
                self.start(topic)
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                if let Err(err) = self.session.reset() {
                    tracing::error!(error = %err, "reset rejected");
                }
                Action::None
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    fn answer(&mut self, response: &Response) -> Action {
        match self.session.answer(response) {
            Ok(_) => self.clear_question_state(),
            Err(SessionError::Evaluation(EvaluationError::NotImplemented)) => {
                self.revealed = true;
            }
            Err(err) => tracing::error!(error = %err, "answer rejected"),
        }
        Action::None
    }

    fn record(&mut self, evaluated: bool) -> Action {
        match self.session.submit_answer(evaluated) {
            Ok(_) => self.clear_question_state(),
            Err(err) => tracing::error!(error = %err, "answer rejected"),
        }
        Action::None
    }

    fn clear_question_state(&mut self) {
        self.selected_option = 0;
        self.answer_input.clear();
        self.revealed = false;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(None)
    }
}
