use serde::Serialize;

use crate::model::difficulty::Difficulty;
use crate::model::ids::PassageId;

/// Marker that replaces the masked term in a prompt.
pub const BLANK: &str = "_____";

/// How the masked term was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStrategy {
    /// Highest TF-IDF content term in the carrier sentence.
    DistinctiveTerm,
    /// No content term was available; the longest word was masked instead.
    LongestWord,
}

/// A fill-in-the-blank question generated from one passage.
///
/// Lives for a single ask/score round and is discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub passage: PassageId,
    /// Carrier sentence with the answer replaced by [`BLANK`].
    pub prompt: String,
    /// Lower-cased masked term.
    pub answer: String,
    pub difficulty: Difficulty,
    pub strategy: MaskStrategy,
}
