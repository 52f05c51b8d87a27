//! Vector-space retrieval over passages.
//!
//! [`Vectorizer`] builds a [`CorpusIndex`] once per corpus; the rest of the
//! pipeline only talks to the index trait, so another embedding scheme can
//! replace TF-IDF without touching retrieval or question generation.

mod sparse;
mod tfidf;

pub use sparse::SparseVector;
pub use tfidf::{TfIdfIndex, TfIdfVectorizer};

use std::cmp::Ordering;

use crate::model::{Passage, PassageId};

/// What to rank passages against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    /// Free text, usually the user's topic.
    Topic(&'a str),
    /// Generic probe used when no topic was given.
    Probe,
}

/// A passage with its similarity to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub passage: PassageId,
    pub score: f64,
}

impl Ranked {
    /// Descending score, then ascending passage id.
    #[must_use]
    pub fn ranking_order(a: &Ranked, b: &Ranked) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.passage.cmp(&b.passage))
    }
}

/// Builds an index over a passage set.
pub trait Vectorizer {
    type Index: CorpusIndex;

    fn build(&self, passages: &[Passage]) -> Self::Index;
}

/// Read-only similarity index with exactly one row per passage.
pub trait CorpusIndex {
    /// Number of indexed passages.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the global vocabulary.
    fn dimension(&self) -> usize;

    /// Every passage scored against `query`, best first, ties by lowest id.
    fn rank(&self, query: Query<'_>) -> Vec<Ranked>;

    /// Weight of `term` in the passage's vector, 0.0 when absent.
    fn term_weight(&self, passage: PassageId, term: &str) -> f64;

    /// Whether `text` shares at least one term with the corpus vocabulary.
    fn knows_any(&self, text: &str) -> bool;
}
