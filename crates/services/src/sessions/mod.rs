mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the quiz session subsystem.
pub use plan::QuizPlan;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, QuizSession};
pub use workflow::{AnswerSource, QuizLoop, RunOutcome, SessionObserver};
