mod difficulty;
mod ids;
mod passage;
mod question;
mod session;

pub use ids::{PassageId, TermId};

pub use difficulty::{Difficulty, DifficultyController, Transition};
pub use passage::Passage;
pub use question::{BLANK, MaskStrategy, Question};
pub use session::{Accuracy, LevelReport, LevelTally, SessionStats, SessionSummary};
