#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod sessions;

pub use tutor_core::Clock;

pub use config::QuizConfig;
pub use error::{ConfigError, QuizError};

pub use sessions::{
    AnswerOutcome, AnswerSource, QuizLoop, QuizPlan, QuizSession, RunOutcome, SessionObserver,
    SessionProgress,
};
