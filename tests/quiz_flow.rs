use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use codedrill::{
    FetchError, GenerateError, Progress, QuestionDefect, QuestionSource, QuestionSourceConfig,
    QuizSession, Response, SessionError, SessionStatus, TextGenerator,
};

const THREE_QUESTIONS: &str = r#"```json
[
  {"text": "What is the capital of France?", "type": "Fill in the Blank", "answer": "Paris"},
  {"text": "Which method borrows a Vec immutably?", "type": "MCQ",
   "options": [
     {"text": "into_iter", "isCorrect": false},
     {"text": "iter", "isCorrect": true},
     {"text": "drain", "isCorrect": false}
   ]},
  {"text": "Rust strings are UTF-8.", "type": "True/False", "answer": true}
]
```"#;

/// Replies with queued responses, one per call, and records the prompts.
struct Scripted {
    replies: Mutex<VecDeque<Result<String, GenerateError>>>,
    prompts: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(replies: Vec<Result<&str, GenerateError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|reply| reply.map(str::to_string))
                    .collect(),
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerateError::EmptyResponse))
    }
}

fn source(generator: Arc<Scripted>) -> QuestionSource {
    QuestionSource::new(generator, QuestionSourceConfig::default())
}

#[tokio::test]
async fn test_start_answer_and_finish() {
    let generator = Scripted::new(vec![Ok(THREE_QUESTIONS)]);
    let source = source(generator.clone());
    let mut session = QuizSession::new();

    session.start(&source, "Rust").await.unwrap();
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(session.position(), 0);
    assert_eq!(session.score(), 0);
    assert_eq!(session.total_questions(), 3);
    assert_eq!(generator.calls(), 1);
    assert!(generator.prompts.lock().unwrap()[0].contains("\"Rust\""));

    session.answer(&Response::Text("paris".into())).unwrap();
    session.answer(&Response::Choice(0)).unwrap();
    let finished = session.answer(&Response::Bool(true)).unwrap();

    assert_eq!(finished, Progress::Finished { score: 2, total: 3 });
    assert_eq!(session.status(), SessionStatus::Finished);
}

#[tokio::test]
async fn test_blank_topic_does_not_call_provider() {
    let generator = Scripted::new(vec![Ok(THREE_QUESTIONS)]);
    let source = source(generator.clone());
    let mut session = QuizSession::new();

    for topic in ["", "   "] {
        assert!(matches!(
            session.start(&source, topic).await,
            Err(SessionError::EmptyTopic)
        ));
    }
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_evaluation_sequence_sets_final_score() {
    let generator = Scripted::new(vec![Ok(THREE_QUESTIONS)]);
    let mut session = QuizSession::new();
    session.start(&source(generator), "Rust").await.unwrap();

    for evaluated in [true, false, true] {
        session.submit_answer(evaluated).unwrap();
    }

    assert_eq!(session.status(), SessionStatus::Finished);
    assert_eq!(session.score(), 2);

    let err = session.submit_answer(true).unwrap_err();
    assert!(matches!(err, SessionError::InvalidState { .. }));
    assert_eq!(session.score(), 2);
    assert_eq!(session.position(), 2);
}

#[tokio::test]
async fn test_restart_with_same_topic_replaces_questions() {
    let second = r#"[{"text": "Is Vec growable?", "type": "True/False", "answer": true}]"#;
    let generator = Scripted::new(vec![Ok(THREE_QUESTIONS), Ok(second)]);
    let source = source(generator.clone());
    let mut session = QuizSession::new();

    session.start(&source, "Rust").await.unwrap();
    for _ in 0..3 {
        session.submit_answer(true).unwrap();
    }
    assert_eq!(session.score(), 3);

    session.start(&source, "Rust").await.unwrap();
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(session.score(), 0);
    assert_eq!(session.position(), 0);
    assert_eq!(session.total_questions(), 1);
    assert_eq!(session.questions()[0].text, "Is Vec growable?");
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_malformed_response_discards_previous_questions() {
    let generator = Scripted::new(vec![Ok(THREE_QUESTIONS), Ok(r#"[{"text": "trunc"#)]);
    let source = source(generator);
    let mut session = QuizSession::new();

    session.start(&source, "Rust").await.unwrap();
    session.submit_answer(true).unwrap();

    let err = session.start(&source, "Rust").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Fetch(ref e) if matches!(**e, FetchError::MalformedResponse { .. })
    ));
    assert_eq!(session.status(), SessionStatus::Failed);
    assert!(session.questions().is_empty());
    assert_eq!(session.score(), 0);
    match session.error() {
        Some(FetchError::MalformedResponse { raw, .. }) => assert_eq!(raw, r#"[{"text": "trunc"#),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_mcq_rejects_whole_batch() {
    let reply = r#"[
        {"text": "Fine", "type": "True/False", "answer": false},
        {"text": "Broken", "type": "MCQ",
         "options": [{"text": "a", "isCorrect": true}, {"text": "b", "isCorrect": true}]}
    ]"#;
    let generator = Scripted::new(vec![Ok(reply)]);
    let mut session = QuizSession::new();

    let err = session.start(&source(generator), "Rust").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Fetch(ref e) if matches!(
            **e,
            FetchError::InvalidQuestion { index: 1, defect: QuestionDefect::CorrectOptionCount(2) }
        )
    ));
    assert_eq!(session.status(), SessionStatus::Failed);
    assert_eq!(session.total_questions(), 0);
}

#[tokio::test]
async fn test_transport_failure_then_retry() {
    let generator = Scripted::new(vec![Err(GenerateError::EmptyResponse), Ok(THREE_QUESTIONS)]);
    let source = source(generator);
    let mut session = QuizSession::new();

    assert!(session.start(&source, "Rust").await.is_err());
    assert!(matches!(session.error(), Some(FetchError::Transport(_))));

    session.start(&source, "Rust").await.unwrap();
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_spawned_fetch_completes_ticket() {
    let generator = Scripted::new(vec![Ok(THREE_QUESTIONS)]);
    let source = source(generator);
    let mut session = QuizSession::new();

    let ticket = session.begin("Rust").unwrap();
    assert!(session.is_loading());

    let fetch_source = source.clone();
    let topic = ticket.topic().to_string();
    let result = tokio::spawn(async move { fetch_source.fetch(&topic).await })
        .await
        .unwrap();

    session.complete(ticket, result).unwrap();
    assert_eq!(session.total_questions(), 3);
}
