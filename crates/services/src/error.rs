//! Shared error types for the services crate.

use thiserror::Error;

use tutor_core::{ChunkError, QuestionError, RetrievalError, ScoreError};

/// Invalid quiz settings.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("number of questions must be at least 1")]
    ZeroQuestions,
    #[error("--strict-topic requires a topic")]
    StrictWithoutTopic,
    #[error(transparent)]
    Bounds(#[from] ChunkError),
    #[error(transparent)]
    Threshold(#[from] ScoreError),
}

/// Errors emitted while planning or running a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Corpus(#[from] ChunkError),
    #[error("no passage mentions the topic \"{topic}\"")]
    TopicNotFound { topic: String },
    #[error("no passage in the notes can be turned into a question")]
    NoQuestions,
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("failed to read an answer")]
    Input(#[from] std::io::Error),
}

impl QuizError {
    /// True for failures caused by the settings rather than the notes or I/O.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
