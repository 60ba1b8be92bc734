use std::fmt;

/// A single quiz item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub kind: QuestionKind,
}

/// The kind of a question, carrying only the fields that kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<Choice> },
    FillBlank { answer: String },
    OutputBased { expected: String },
    TrueFalse { answer: bool },
}

/// One option of a multiple choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub text: String,
    pub is_correct: bool,
}

/// Wire labels used by the generation payload.
pub const MCQ_LABEL: &str = "MCQ";
pub const FILL_BLANK_LABEL: &str = "Fill in the Blank";
pub const OUTPUT_BASED_LABEL: &str = "Output-Based";
pub const TRUE_FALSE_LABEL: &str = "True/False";

impl QuestionKind {
    /// The `type` value this kind uses in the generation payload.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => MCQ_LABEL,
            QuestionKind::FillBlank { .. } => FILL_BLANK_LABEL,
            QuestionKind::OutputBased { .. } => OUTPUT_BASED_LABEL,
            QuestionKind::TrueFalse { .. } => TRUE_FALSE_LABEL,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Question {
    pub fn multiple_choice(text: impl Into<String>, options: Vec<Choice>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::MultipleChoice { options },
        }
    }

    pub fn fill_blank(text: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::FillBlank {
                answer: answer.into(),
            },
        }
    }

    pub fn output_based(text: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::OutputBased {
                expected: expected.into(),
            },
        }
    }

    pub fn true_false(text: impl Into<String>, answer: bool) -> Self {
        Self {
            text: text.into(),
            kind: QuestionKind::TrueFalse { answer },
        }
    }

    /// Options of a multiple choice question, empty for every other kind.
    pub fn options(&self) -> &[Choice] {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options,
            _ => &[],
        }
    }

    /// The correct answer rendered as text, for result screens.
    pub fn solution(&self) -> String {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options
                .iter()
                .find(|choice| choice.is_correct)
                .map(|choice| choice.text.clone())
                .unwrap_or_default(),
            QuestionKind::FillBlank { answer } => answer.clone(),
            QuestionKind::OutputBased { expected } => expected.clone(),
            QuestionKind::TrueFalse { answer: true } => "True".to_string(),
            QuestionKind::TrueFalse { answer: false } => "False".to_string(),
        }
    }
}

impl Choice {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}
