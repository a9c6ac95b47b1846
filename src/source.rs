// src/source.rs

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use validator::Validate;

use crate::models::player::LeaderboardEntry;
use crate::models::question::{Question, QuestionKind, QuestionRecord};

/// Errors from the static JSON endpoints backing the widget.
#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "failed to read source file: {}", e),
            SourceError::Parse(e) => write!(f, "failed to parse source file: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err)
    }
}

/// Supplier of the question pool. The engine never loads anything
/// itself; it is handed the pool after this has resolved.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Question>, SourceError>;
}

/// Supplier of the pre-ranked leaderboard rows.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn load(&self) -> Result<Vec<LeaderboardEntry>, SourceError>;
}

/// Reads the `questions.json` deployment artifact.
///
/// Records are validated on the way in; a malformed record is skipped
/// with a warning rather than poisoning the whole pool. Ids are
/// assigned sequentially over the accepted records.
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for FileQuestionSource {
    async fn load(&self) -> Result<Vec<Question>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records: Vec<QuestionRecord> = serde_json::from_slice(&bytes)?;

        let mut questions = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match check_record(&record) {
                Ok(()) => {
                    questions.push(Question {
                        id: questions.len() as i64 + 1,
                        kind: record.kind,
                        prompt: record.question,
                        options: record.options,
                        answer: record.answer,
                        marks: record.marks,
                    });
                }
                Err(reason) => {
                    tracing::warn!(
                        "Skipping question {} in {}: {}",
                        index,
                        self.path.display(),
                        reason
                    );
                }
            }
        }

        tracing::info!(
            "Loaded {} questions from {}",
            questions.len(),
            self.path.display()
        );
        Ok(questions)
    }
}

/// Field checks plus the kind-specific invariants: a multiple-choice
/// question needs at least two options and its answer must be one of
/// them.
fn check_record(record: &QuestionRecord) -> Result<(), String> {
    if let Err(e) = record.validate() {
        return Err(e.to_string());
    }

    match record.kind {
        QuestionKind::MultipleChoice => {
            if record.options.len() < 2 {
                return Err("multiple-choice question needs at least 2 options".to_string());
            }
            if !record.options.contains(&record.answer) {
                return Err("answer is not one of the options".to_string());
            }
        }
        QuestionKind::FillInBlank => {
            if !record.options.is_empty() {
                return Err("text question must not carry options".to_string());
            }
        }
    }
    Ok(())
}

/// Reads the `leaderboard.json` deployment artifact.
///
/// Re-read per request: the file belongs to the upstream that ranks the
/// players and may be redeployed under the running service.
pub struct FileLeaderboardSource {
    path: PathBuf,
}

impl FileLeaderboardSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LeaderboardSource for FileLeaderboardSource {
    async fn load(&self) -> Result<Vec<LeaderboardEntry>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let entries: Vec<LeaderboardEntry> = serde_json::from_slice(&bytes)?;
        Ok(entries)
    }
}
