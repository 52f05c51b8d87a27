//! Fuzzy answer checking.
//!
//! Similarity is the Ratcliff/Obershelp ratio `2·M / (|a| + |b|)`, where `M`
//! counts the characters in the longest common block and, recursively, in
//! the common blocks to its left and right.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("acceptance threshold must be within [0, 1], got {provided}")]
    InvalidThreshold { provided: f64 },
}

/// Outcome of comparing a submitted answer with the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub is_correct: bool,
    /// Similarity ratio in `[0, 1]`.
    pub similarity: f64,
}

/// Accepts answers whose similarity reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerScorer {
    threshold: f64,
}

impl AnswerScorer {
    pub const DEFAULT_THRESHOLD: f64 = 0.6;

    /// # Errors
    ///
    /// Returns `ScoreError::InvalidThreshold` when `threshold` is outside `[0, 1]` or NaN.
    pub fn new(threshold: f64) -> Result<Self, ScoreError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ScoreError::InvalidThreshold {
                provided: threshold,
            });
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Case- and surrounding-whitespace-insensitive comparison.
    ///
    /// A blank submission is never correct.
    #[must_use]
    pub fn score(&self, submitted: &str, expected: &str) -> Score {
        let submitted = normalize(submitted);
        let expected = normalize(expected);
        if submitted.is_empty() {
            return Score {
                is_correct: false,
                similarity: 0.0,
            };
        }

        let similarity = similarity_ratio(&submitted, &expected);
        Score {
            is_correct: similarity >= self.threshold,
            similarity,
        }
    }
}

impl Default for AnswerScorer {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Ratcliff/Obershelp similarity over characters. Two empty strings score 1.0.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, k) = longest_block(&a[a_lo..a_hi], &b[b_lo..b_hi]);
        if k == 0 {
            continue;
        }
        matched += k;
        let (i, j) = (a_lo + i, b_lo + j);
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + k < a_hi && j + k < b_hi {
            pending.push((i + k, a_hi, j + k, b_hi));
        }
    }
    matched
}

/// Longest common block `(start_a, start_b, len)`; earliest in `a`, then in `b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0_usize; b.len() + 1];
    let mut row = vec![0_usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = row[j + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut row);
    }
    best
}
