//! Question fetching: prompt, generate, parse, validate.

mod parse;
mod prompt;

use std::sync::Arc;

use thiserror::Error;

use crate::generator::{GenerateError, TextGenerator};
use crate::models::Question;

pub use parse::{QuestionDefect, parse_questions, validate_questions};
pub use prompt::build_prompt;

/// Number of questions requested by default.
pub const DEFAULT_QUESTION_COUNT: usize = 5;
/// Difficulty tier requested by default.
pub const DEFAULT_DIFFICULTY: &str = "advanced";

/// Errors raised while fetching a question list.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("response is not a JSON question list: {source}")]
    MalformedResponse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("question {} is invalid: {defect}", .index + 1)]
    InvalidQuestion {
        index: usize,
        defect: QuestionDefect,
    },

    #[error("response contained no questions")]
    NoQuestions,

    #[error("question provider failed: {0}")]
    Transport(#[from] GenerateError),
}

#[derive(Debug, Clone)]
pub struct QuestionSourceConfig {
    pub question_count: usize,
    pub difficulty: String,
}

impl Default for QuestionSourceConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            difficulty: DEFAULT_DIFFICULTY.to_string(),
        }
    }
}

/// Fetches validated questions for a topic from a text generator.
#[derive(Clone)]
pub struct QuestionSource {
    generator: Arc<dyn TextGenerator>,
    config: QuestionSourceConfig,
}

impl QuestionSource {
    pub fn new(generator: Arc<dyn TextGenerator>, config: QuestionSourceConfig) -> Self {
        Self { generator, config }
    }

    /// Fetch a question list for `topic`.
    ///
    /// Makes exactly one generator call for a non-blank topic and none
    /// otherwise. Any invalid item rejects the whole list.
    pub async fn fetch(&self, topic: &str) -> Result<Vec<Question>, FetchError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(FetchError::EmptyTopic);
        }

        let prompt = build_prompt(topic, self.config.question_count, &self.config.difficulty);
        let raw = self.generator.generate_text(&prompt).await?;

        let questions = parse_questions(&raw).inspect_err(|err| {
            tracing::warn!(topic, error = %err, "rejected generated questions");
        })?;

        if questions.len() != self.config.question_count {
            tracing::warn!(
                topic,
                requested = self.config.question_count,
                received = questions.len(),
                "question count differs from request"
            );
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct Canned {
        reply: String,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError> {
            assert!(prompt.contains("Generate 5 questions"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl TextGenerator for Unreachable {
        async fn generate_text(&self, _prompt: &str) -> Result<String, GenerateError> {
            Err(GenerateError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_blank_topic_makes_no_call() {
        let canned = Canned::new("[]");
        let source = QuestionSource::new(canned.clone(), QuestionSourceConfig::default());

        assert!(matches!(source.fetch("   ").await, Err(FetchError::EmptyTopic)));
        assert_eq!(canned.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_makes_one_call() {
        let canned = Canned::new(r#"[{"text": "Rust is memory safe", "type": "True/False", "answer": true}]"#);
        let source = QuestionSource::new(canned.clone(), QuestionSourceConfig::default());

        let questions = source.fetch("Rust").await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(canned.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_error() {
        let source = QuestionSource::new(Arc::new(Unreachable), QuestionSourceConfig::default());
        assert!(matches!(
            source.fetch("Rust").await,
            Err(FetchError::Transport(GenerateError::EmptyResponse))
        ));
    }

    #[test]
    fn test_invalid_question_message_is_one_based() {
        let err = FetchError::InvalidQuestion {
            index: 2,
            defect: QuestionDefect::NoOptions,
        };
        assert_eq!(
            err.to_string(),
            "question 3 is invalid: multiple choice question has no options"
        );
    }
}
