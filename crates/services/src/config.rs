//! Quiz settings shared by the plan and the loop.

use tutor_core::{AnswerScorer, ChunkBounds};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    num_questions: usize,
    topic: Option<String>,
    strict_topic: bool,
    bounds: ChunkBounds,
    threshold: f64,
}

impl QuizConfig {
    pub const DEFAULT_NUM_QUESTIONS: usize = 5;

    #[must_use]
    pub fn with_num_questions(mut self, num_questions: usize) -> Self {
        self.num_questions = num_questions;
        self
    }

    /// Blank topics are treated as no topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        let topic: String = topic.into();
        let topic = topic.trim();
        self.topic = (!topic.is_empty()).then(|| topic.to_owned());
        self
    }

    #[must_use]
    pub fn with_strict_topic(mut self, strict: bool) -> Self {
        self.strict_topic = strict;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: ChunkBounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn num_questions(&self) -> usize {
        self.num_questions
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn strict_topic(&self) -> bool {
        self.strict_topic
    }

    #[must_use]
    pub fn bounds(&self) -> ChunkBounds {
        self.bounds
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Validate settings and build the scorer they describe.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero question count, a strict topic filter
    /// without a topic, or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<AnswerScorer, ConfigError> {
        if self.num_questions == 0 {
            return Err(ConfigError::ZeroQuestions);
        }
        if self.strict_topic && self.topic.is_none() {
            return Err(ConfigError::StrictWithoutTopic);
        }
        Ok(AnswerScorer::new(self.threshold)?)
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            num_questions: Self::DEFAULT_NUM_QUESTIONS,
            topic: None,
            strict_topic: false,
            bounds: ChunkBounds::default(),
            threshold: AnswerScorer::DEFAULT_THRESHOLD,
        }
    }
}
