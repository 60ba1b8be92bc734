use crate::models::{FILL_BLANK_LABEL, MCQ_LABEL, OUTPUT_BASED_LABEL, TRUE_FALSE_LABEL};

/// Build the generation prompt for `topic`.
pub fn build_prompt(topic: &str, count: usize, difficulty: &str) -> String {
    format!(
        r#"Generate {count} questions for the topic "{topic}" with the following types:
1. Multiple Choice Questions ("{MCQ_LABEL}")
2. Fill in the Blanks ("{FILL_BLANK_LABEL}")
3. Output-Based Questions ("{OUTPUT_BASED_LABEL}")
4. True/False Questions ("{TRUE_FALSE_LABEL}")

Use every type at least once. Ensure the questions are suitable for an {difficulty} level.
Multiple choice questions must have exactly one correct option.
Return only a JSON array, with no surrounding text, in the following format:
[
  {{
    "text": "Question text",
    "type": "{MCQ_LABEL}",
    "options": [
      {{ "text": "Option 1", "isCorrect": true }},
      {{ "text": "Option 2", "isCorrect": false }},
      {{ "text": "Option 3", "isCorrect": false }},
      {{ "text": "Option 4", "isCorrect": false }}
    ]
  }},
  {{
    "text": "Question text",
    "type": "{FILL_BLANK_LABEL}",
    "answer": "Correct answer"
  }},
  {{
    "text": "Question text",
    "type": "{OUTPUT_BASED_LABEL}",
    "answer": "Expected output"
  }},
  {{
    "text": "Question text",
    "type": "{TRUE_FALSE_LABEL}",
    "answer": true
  }}
]"#,
        topic = topic.trim(),
    )
}
