//! Difficulty-aware passage retrieval.
//!
//! Difficulty maps to a passage length band computed from the corpus itself,
//! so "hard" always means the longest third of *these* notes.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Difficulty, Passage, PassageId};
use crate::vector::{CorpusIndex, Query};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RetrievalError {
    #[error("no passage in the {difficulty} length band is available")]
    NoMatch { difficulty: Difficulty },

    #[error("every passage has been excluded")]
    Exhausted,
}

//
// ─── LENGTH BANDS ──────────────────────────────────────────────────────────────
//

/// Length cut-offs splitting the corpus into thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBands {
    easy_max: usize,
    medium_max: usize,
}

impl LengthBands {
    /// Easy covers lengths up to the value at rank ⌈n/3⌉, medium up to rank
    /// ⌈2n/3⌉, hard everything longer. Duplicate lengths can leave a band empty.
    #[must_use]
    pub fn from_passages(passages: &[Passage]) -> Self {
        let mut lengths: Vec<usize> = passages.iter().map(Passage::length).collect();
        lengths.sort_unstable();

        let n = lengths.len();
        if n == 0 {
            return Self::new(0, 0);
        }
        let easy_rank = n.div_ceil(3);
        let medium_rank = (2 * n).div_ceil(3);
        Self::new(lengths[easy_rank - 1], lengths[medium_rank - 1])
    }

    #[must_use]
    pub fn new(easy_max: usize, medium_max: usize) -> Self {
        Self {
            easy_max,
            medium_max: medium_max.max(easy_max),
        }
    }

    #[must_use]
    pub fn easy_max(&self) -> usize {
        self.easy_max
    }

    #[must_use]
    pub fn medium_max(&self) -> usize {
        self.medium_max
    }

    #[must_use]
    pub fn classify(&self, length: usize) -> Difficulty {
        if length <= self.easy_max {
            Difficulty::Easy
        } else if length <= self.medium_max {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }

    #[must_use]
    pub fn contains(&self, difficulty: Difficulty, length: usize) -> bool {
        self.classify(length) == difficulty
    }
}

//
// ─── RETRIEVER ─────────────────────────────────────────────────────────────────
//

/// A selected passage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retrieval {
    pub passage: PassageId,
    pub score: f64,
    /// True when the requested band had no candidate and the band was ignored.
    pub fallback: bool,
}

/// Picks the best passage for a query within a difficulty band.
pub struct Retriever<'a> {
    index: &'a dyn CorpusIndex,
    passages: &'a [Passage],
    bands: LengthBands,
}

impl<'a> Retriever<'a> {
    #[must_use]
    pub fn new(index: &'a dyn CorpusIndex, passages: &'a [Passage], bands: LengthBands) -> Self {
        Self {
            index,
            passages,
            bands,
        }
    }

    #[must_use]
    pub fn bands(&self) -> LengthBands {
        self.bands
    }

    /// Highest-ranked non-excluded passage whose length falls in the band.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::NoMatch` when the band has no eligible passage.
    pub fn select(
        &self,
        query: Query<'_>,
        difficulty: Difficulty,
        excluded: &HashSet<PassageId>,
    ) -> Result<Retrieval, RetrievalError> {
        self.index
            .rank(query)
            .into_iter()
            .filter(|r| !excluded.contains(&r.passage))
            .find(|r| {
                self.passages
                    .get(r.passage.index())
                    .is_some_and(|p| self.bands.contains(difficulty, p.length()))
            })
            .map(|r| Retrieval {
                passage: r.passage,
                score: r.score,
                fallback: false,
            })
            .ok_or(RetrievalError::NoMatch { difficulty })
    }

    /// Like [`Retriever::select`], but an empty band falls back to the closest
    /// non-excluded passage of any length. The fallback is logged.
    ///
    /// # Errors
    ///
    /// Returns `RetrievalError::Exhausted` when every passage is excluded.
    pub fn select_or_nearest(
        &self,
        query: Query<'_>,
        difficulty: Difficulty,
        excluded: &HashSet<PassageId>,
    ) -> Result<Retrieval, RetrievalError> {
        match self.select(query, difficulty, excluded) {
            Ok(hit) => {
                debug!(passage = %hit.passage, score = hit.score, %difficulty, "retrieved passage");
                Ok(hit)
            }
            Err(RetrievalError::NoMatch { .. }) => {
                let nearest = self
                    .index
                    .rank(query)
                    .into_iter()
                    .find(|r| !excluded.contains(&r.passage))
                    .ok_or(RetrievalError::Exhausted)?;
                warn!(
                    %difficulty,
                    passage = %nearest.passage,
                    "no passage left in the {difficulty} length band; using the closest passage instead"
                );
                Ok(Retrieval {
                    passage: nearest.passage,
                    score: nearest.score,
                    fallback: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{TfIdfVectorizer, Vectorizer};

    fn corpus(texts: &[&str]) -> Vec<Passage> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| Passage::new(PassageId::new(idx), *text))
            .collect()
    }

    fn ids(list: &[usize]) -> HashSet<PassageId> {
        list.iter().copied().map(PassageId::new).collect()
    }

    #[test]
    fn bands_split_into_thirds() {
        let passages = corpus(&["aaa", "aaaaaa", "a", "aaaaaaaaa", "aa", "aaaaaaaaaaaa"]);
        let bands = LengthBands::from_passages(&passages);
        assert_eq!(bands.easy_max(), 2);
        assert_eq!(bands.medium_max(), 6);
        assert_eq!(bands.classify(1), Difficulty::Easy);
        assert_eq!(bands.classify(3), Difficulty::Medium);
        assert_eq!(bands.classify(12), Difficulty::Hard);
    }

    #[test]
    fn two_passages_leave_hard_band_empty() {
        let passages = corpus(&["short one", "a much longer passage"]);
        let bands = LengthBands::from_passages(&passages);
        assert!(bands.contains(Difficulty::Easy, passages[0].length()));
        assert!(bands.contains(Difficulty::Medium, passages[1].length()));
        assert!(!passages.iter().any(|p| bands.contains(Difficulty::Hard, p.length())));
    }

    #[test]
    fn select_stays_inside_the_band() {
        let passages = corpus(&[
            "gravity",
            "gravity bends light near mass",
            "gravity keeps planets in orbit around stars over long periods",
        ]);
        let index = TfIdfVectorizer.build(&passages);
        let retriever = Retriever::new(&index, &passages, LengthBands::from_passages(&passages));

        let hit = retriever
            .select(Query::Topic("gravity"), Difficulty::Hard, &HashSet::new())
            .unwrap();
        assert_eq!(hit.passage, PassageId::new(2));
        assert!(!hit.fallback);
    }

    #[test]
    fn excluded_passages_are_skipped() {
        let passages = corpus(&["orbit", "orbit star", "orbit star planet"]);
        let index = TfIdfVectorizer.build(&passages);
        let retriever = Retriever::new(&index, &passages, LengthBands::new(100, 100));

        let hit = retriever
            .select(Query::Topic("orbit"), Difficulty::Easy, &ids(&[0]))
            .unwrap();
        assert_eq!(hit.passage, PassageId::new(1));
    }

    #[test]
    fn empty_band_is_no_match() {
        let passages = corpus(&["short one", "a much longer passage"]);
        let index = TfIdfVectorizer.build(&passages);
        let retriever = Retriever::new(&index, &passages, LengthBands::from_passages(&passages));

        let err = retriever
            .select(Query::Probe, Difficulty::Hard, &HashSet::new())
            .unwrap_err();
        assert_eq!(err, RetrievalError::NoMatch { difficulty: Difficulty::Hard });
    }

    #[test]
    fn empty_band_falls_back_to_nearest() {
        let passages = corpus(&["cells divide", "cells grow and divide quickly"]);
        let index = TfIdfVectorizer.build(&passages);
        let retriever = Retriever::new(&index, &passages, LengthBands::from_passages(&passages));

        let hit = retriever
            .select_or_nearest(Query::Topic("grow"), Difficulty::Hard, &HashSet::new())
            .unwrap();
        assert_eq!(hit.passage, PassageId::new(1));
        assert!(hit.fallback);
    }

    #[test]
    fn fully_excluded_corpus_is_exhausted() {
        let passages = corpus(&["cells divide", "cells grow"]);
        let index = TfIdfVectorizer.build(&passages);
        let retriever = Retriever::new(&index, &passages, LengthBands::from_passages(&passages));

        let err = retriever
            .select_or_nearest(Query::Probe, Difficulty::Medium, &ids(&[0, 1]))
            .unwrap_err();
        assert_eq!(err, RetrievalError::Exhausted);
    }
}
