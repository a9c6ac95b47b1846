// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Question type, as spelled by the `questions.json` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "text")]
    FillInBlank,
}

/// A question as the session engine sees it.
///
/// The wire records carry no identifier; the source assigns sequential
/// ids at load time, stable for the lifetime of the process.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: i64,
    pub kind: QuestionKind,

    /// The prompt text. For fill-in questions this may contain a
    /// blank-marker token (e.g. "____").
    pub prompt: String,

    /// Ordered list of choices. Empty for fill-in questions.
    pub options: Vec<String>,

    /// The reference answer: an exact member of `options` for
    /// multiple-choice, the expected fill-in text otherwise.
    pub answer: String,

    /// Points awarded on a correct answer.
    pub marks: u32,
}

/// One record of the `questions.json` endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionRecord {
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    #[validate(length(min = 1, max = 1000))]
    pub question: String,

    #[serde(default)]
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,

    #[validate(length(min = 1, max = 500))]
    pub answer: String,

    pub marks: u32,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.is_empty() {
            return Err(validator::ValidationError::new("option_cannot_be_empty"));
        }
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

/// DTO for sending a question to the presentation shell (excludes the
/// answer so the client never sees the key).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
    pub options: Vec<String>,
    pub marks: u32,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            kind: q.kind,
            question: q.prompt.clone(),
            options: q.options.clone(),
            marks: q.marks,
        }
    }
}
