//! Parsing and validation of generated question lists.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    Choice, FILL_BLANK_LABEL, MCQ_LABEL, OUTPUT_BASED_LABEL, Question, QuestionKind,
    TRUE_FALSE_LABEL,
};

use super::FetchError;

/// Why a single generated item was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionDefect {
    #[error("item is not a question object: {0}")]
    Shape(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` does not belong to a {kind} question")]
    UnexpectedField {
        field: &'static str,
        kind: &'static str,
    },

    #[error("field `{field}` must be a {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("question text is empty")]
    EmptyText,

    #[error("unknown question type {0:?}")]
    UnknownKind(String),

    #[error("multiple choice question has no options")]
    NoOptions,

    #[error("option {0} has empty text")]
    EmptyOptionText(usize),

    #[error("expected exactly one correct option, found {0}")]
    CorrectOptionCount(usize),

    #[error("answer is empty")]
    EmptyAnswer,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    text: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    options: Option<Vec<WireChoice>>,
    answer: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireChoice {
    text: String,
    is_correct: bool,
}

/// Strip surrounding whitespace and one Markdown code fence, if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };

    // The opening fence may carry a language tag such as `json`.
    inner
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim()
}

/// Parse a raw generation response into validated questions.
///
/// The whole batch is rejected on the first invalid item.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, FetchError> {
    let items: Vec<Value> =
        serde_json::from_str(strip_code_fence(raw)).map_err(|source| {
            FetchError::MalformedResponse {
                raw: raw.to_string(),
                source,
            }
        })?;

    if items.is_empty() {
        return Err(FetchError::NoQuestions);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            validate_item(item).map_err(|defect| FetchError::InvalidQuestion { index, defect })
        })
        .collect()
}

fn validate_item(item: Value) -> Result<Question, QuestionDefect> {
    let wire: WireQuestion =
        serde_json::from_value(item).map_err(|err| QuestionDefect::Shape(err.to_string()))?;

    let text = wire.text.ok_or(QuestionDefect::MissingField("text"))?;
    let label = wire.kind.ok_or(QuestionDefect::MissingField("type"))?;

    let kind = match label.as_str() {
        MCQ_LABEL => {
            reject_field(wire.answer.is_some(), "answer", MCQ_LABEL)?;
            let options = wire.options.ok_or(QuestionDefect::MissingField("options"))?;
            QuestionKind::MultipleChoice {
                options: options
                    .into_iter()
                    .map(|opt| Choice::new(opt.text, opt.is_correct))
                    .collect(),
            }
        }
        FILL_BLANK_LABEL => {
            reject_field(wire.options.is_some(), "options", FILL_BLANK_LABEL)?;
            QuestionKind::FillBlank {
                answer: text_answer(wire.answer)?,
            }
        }
        OUTPUT_BASED_LABEL => {
            reject_field(wire.options.is_some(), "options", OUTPUT_BASED_LABEL)?;
            QuestionKind::OutputBased {
                expected: text_answer(wire.answer)?,
            }
        }
        TRUE_FALSE_LABEL => {
            reject_field(wire.options.is_some(), "options", TRUE_FALSE_LABEL)?;
            match wire.answer {
                Some(Value::Bool(answer)) => QuestionKind::TrueFalse { answer },
                Some(_) => {
                    return Err(QuestionDefect::WrongFieldType {
                        field: "answer",
                        expected: "boolean",
                    });
                }
                None => return Err(QuestionDefect::MissingField("answer")),
            }
        }
        _ => return Err(QuestionDefect::UnknownKind(label)),
    };

    let question = Question { text, kind };
    check_question(&question)?;
    Ok(question)
}

/// Check already-typed questions, rejecting the whole list on the first
/// invalid item.
pub fn validate_questions(questions: &[Question]) -> Result<(), FetchError> {
    if questions.is_empty() {
        return Err(FetchError::NoQuestions);
    }
    questions.iter().enumerate().try_for_each(|(index, question)| {
        check_question(question).map_err(|defect| FetchError::InvalidQuestion { index, defect })
    })
}

fn check_question(question: &Question) -> Result<(), QuestionDefect> {
    if question.text.trim().is_empty() {
        return Err(QuestionDefect::EmptyText);
    }

    match &question.kind {
        QuestionKind::MultipleChoice { options } => check_options(options),
        QuestionKind::FillBlank { answer } | QuestionKind::OutputBased { expected: answer } => {
            if answer.trim().is_empty() {
                Err(QuestionDefect::EmptyAnswer)
            } else {
                Ok(())
            }
        }
        QuestionKind::TrueFalse { .. } => Ok(()),
    }
}

fn reject_field(present: bool, field: &'static str, kind: &'static str) -> Result<(), QuestionDefect> {
    if present {
        Err(QuestionDefect::UnexpectedField { field, kind })
    } else {
        Ok(())
    }
}

fn text_answer(answer: Option<Value>) -> Result<String, QuestionDefect> {
    match answer {
        Some(Value::String(answer)) => Ok(answer),
        Some(_) => Err(QuestionDefect::WrongFieldType {
            field: "answer",
            expected: "string",
        }),
        None => Err(QuestionDefect::MissingField("answer")),
    }
}

fn check_options(options: &[Choice]) -> Result<(), QuestionDefect> {
    if options.is_empty() {
        return Err(QuestionDefect::NoOptions);
    }
    if let Some(index) = options.iter().position(|opt| opt.text.trim().is_empty()) {
        return Err(QuestionDefect::EmptyOptionText(index));
    }

    let correct = options.iter().filter(|opt| opt.is_correct).count();
    if correct != 1 {
        return Err(QuestionDefect::CorrectOptionCount(correct));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: &str = r#"[
        {"text": "Which keyword declares a constant?", "type": "MCQ",
         "options": [{"text": "let", "isCorrect": false}, {"text": "const", "isCorrect": true}]},
        {"text": "Capital of France is ___", "type": "Fill in the Blank", "answer": "Paris"},
        {"text": "What does print(2 ** 3) output?", "type": "Output-Based", "answer": "8"},
        {"text": "Python lists are immutable.", "type": "True/False", "answer": false}
    ]"#;

    fn defect_of(raw: &str) -> (usize, QuestionDefect) {
        match parse_questions(raw) {
            Err(FetchError::InvalidQuestion { index, defect }) => (index, defect),
            other => panic!("expected InvalidQuestion, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_every_kind() {
        let questions = parse_questions(ALL_KINDS).unwrap();
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].options().len(), 2);
        assert_eq!(
            questions[1].kind,
            QuestionKind::FillBlank {
                answer: "Paris".into()
            }
        );
        assert_eq!(
            questions[2].kind,
            QuestionKind::OutputBased {
                expected: "8".into()
            }
        );
        assert_eq!(questions[3].kind, QuestionKind::TrueFalse { answer: false });
    }

    #[test]
    fn test_strips_code_fence() {
        let fenced = format!("```json\n{ALL_KINDS}\n```\n");
        assert_eq!(parse_questions(&fenced).unwrap().len(), 4);
        assert_eq!(strip_code_fence("  ```\n[]```  "), "[]");
        assert_eq!(strip_code_fence(" [1] "), "[1]");
        assert_eq!(strip_code_fence("```[1,\n2]```"), "[1,\n2]");
    }

    #[test]
    fn test_one_line_fence_with_language_tag() {
        assert_eq!(strip_code_fence("```json [1]```"), "[1]");
        let one_line = r#"```json [{"text": "q", "type": "True/False", "answer": true}]```"#;
        assert_eq!(parse_questions(one_line).unwrap().len(), 1);
    }

    #[test]
    fn test_typed_questions_are_checked() {
        let questions = vec![
            Question::true_false("fine", true),
            Question::multiple_choice(
                "two right",
                vec![Choice::new("a", true), Choice::new("b", true)],
            ),
        ];
        assert!(matches!(
            validate_questions(&questions),
            Err(FetchError::InvalidQuestion {
                index: 1,
                defect: QuestionDefect::CorrectOptionCount(2)
            })
        ));

        let questions = vec![Question::fill_blank("", "")];
        assert!(matches!(
            validate_questions(&questions),
            Err(FetchError::InvalidQuestion {
                index: 0,
                defect: QuestionDefect::EmptyText
            })
        ));

        let questions = vec![Question::multiple_choice("q", vec![])];
        assert!(matches!(
            validate_questions(&questions),
            Err(FetchError::InvalidQuestion {
                defect: QuestionDefect::NoOptions,
                ..
            })
        ));

        assert!(matches!(validate_questions(&[]), Err(FetchError::NoQuestions)));
        assert!(validate_questions(&[Question::output_based("q", "4")]).is_ok());
    }

    #[test]
    fn test_demo_replay_file_is_valid() {
        let questions = parse_questions(include_str!("../../demos/rust-ownership.json")).unwrap();
        assert_eq!(questions.len(), 5);
    }

    #[test]
    fn test_malformed_json_keeps_raw_text() {
        let raw = r#"[{"text": "unterminated"#;
        match parse_questions(raw) {
            Err(FetchError::MalformedResponse { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_top_level_object_is_malformed() {
        assert!(matches!(
            parse_questions(r#"{"questions": []}"#),
            Err(FetchError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_empty_list() {
        assert!(matches!(parse_questions("[]"), Err(FetchError::NoQuestions)));
    }

    #[test]
    fn test_mcq_needs_exactly_one_correct_option() {
        let none_correct = r#"[{"text": "q", "type": "MCQ",
            "options": [{"text": "a", "isCorrect": false}, {"text": "b", "isCorrect": false}]}]"#;
        assert_eq!(defect_of(none_correct), (0, QuestionDefect::CorrectOptionCount(0)));

        let two_correct = r#"[
            {"text": "ok", "type": "True/False", "answer": true},
            {"text": "q", "type": "MCQ",
             "options": [{"text": "a", "isCorrect": true}, {"text": "b", "isCorrect": true}]}]"#;
        assert_eq!(defect_of(two_correct), (1, QuestionDefect::CorrectOptionCount(2)));
    }

    #[test]
    fn test_mcq_without_options() {
        let raw = r#"[{"text": "q", "type": "MCQ", "options": []}]"#;
        assert_eq!(defect_of(raw), (0, QuestionDefect::NoOptions));

        let raw = r#"[{"text": "q", "type": "MCQ"}]"#;
        assert_eq!(defect_of(raw), (0, QuestionDefect::MissingField("options")));
    }

    #[test]
    fn test_unknown_type() {
        let raw = r#"[{"text": "q", "type": "Essay", "answer": "x"}]"#;
        assert_eq!(defect_of(raw), (0, QuestionDefect::UnknownKind("Essay".into())));
    }

    #[test]
    fn test_field_from_another_kind() {
        let raw = r#"[{"text": "q", "type": "True/False", "answer": true,
            "options": [{"text": "a", "isCorrect": true}]}]"#;
        assert_eq!(
            defect_of(raw),
            (
                0,
                QuestionDefect::UnexpectedField {
                    field: "options",
                    kind: "True/False"
                }
            )
        );
    }

    #[test]
    fn test_answer_types() {
        let raw = r#"[{"text": "q", "type": "True/False", "answer": "true"}]"#;
        assert!(matches!(defect_of(raw).1, QuestionDefect::WrongFieldType { .. }));

        let raw = r#"[{"text": "q", "type": "Fill in the Blank", "answer": "  "}]"#;
        assert_eq!(defect_of(raw).1, QuestionDefect::EmptyAnswer);

        let raw = r#"[{"text": "q", "type": "Output-Based"}]"#;
        assert_eq!(defect_of(raw).1, QuestionDefect::MissingField("answer"));
    }

    #[test]
    fn test_blank_text() {
        let raw = r#"[{"text": " ", "type": "True/False", "answer": true}]"#;
        assert_eq!(defect_of(raw).1, QuestionDefect::EmptyText);

        let raw = r#"[42]"#;
        assert!(matches!(defect_of(raw).1, QuestionDefect::Shape(_)));
    }
}
