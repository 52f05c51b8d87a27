use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::model::Difficulty;

//
// ─── TALLIES ──────────────────────────────────────────────────────────────────
//

/// Attempts and correct answers at one difficulty level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelTally {
    pub attempts: u32,
    pub correct: u32,
}

impl LevelTally {
    #[must_use]
    pub fn accuracy(&self) -> Accuracy {
        Accuracy::from_counts(self.correct, self.attempts)
    }
}

/// Percentage of correct answers, or `NoAttempts` when nothing was asked.
///
/// Serializes as the bare percentage, or `null` for `NoAttempts`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Accuracy {
    NoAttempts,
    Percent(f64),
}

impl Accuracy {
    #[must_use]
    pub fn from_counts(correct: u32, attempts: u32) -> Self {
        if attempts == 0 {
            Accuracy::NoAttempts
        } else {
            Accuracy::Percent(100.0 * f64::from(correct) / f64::from(attempts))
        }
    }

    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        match self {
            Accuracy::NoAttempts => None,
            Accuracy::Percent(p) => Some(*p),
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accuracy::NoAttempts => f.write_str("no attempts"),
            Accuracy::Percent(p) => write!(f, "{p:.1}%"),
        }
    }
}

//
// ─── SESSION STATS ────────────────────────────────────────────────────────────
//

/// Running counters for one quiz session.
///
/// Owned by the caller and passed by `&mut` through the session loop, so two
/// sessions never share counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    started_at: DateTime<Utc>,
    correct: u32,
    incorrect: u32,
    levels: [LevelTally; 3],
}

impl SessionStats {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            correct: 0,
            incorrect: 0,
            levels: [LevelTally::default(); 3],
        }
    }

    /// Records one scored answer at the difficulty the question was generated for.
    pub fn record(&mut self, difficulty: Difficulty, correct: bool) {
        let tally = &mut self.levels[difficulty.index()];
        tally.attempts = tally.attempts.saturating_add(1);
        if correct {
            tally.correct = tally.correct.saturating_add(1);
            self.correct = self.correct.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    #[must_use]
    pub fn level(&self, difficulty: Difficulty) -> LevelTally {
        self.levels[difficulty.index()]
    }

    /// Freezes the counters into a report.
    #[must_use]
    pub fn finalize(&self, completed_at: DateTime<Utc>) -> SessionSummary {
        let levels = Difficulty::ALL
            .iter()
            .map(|&difficulty| {
                let tally = self.level(difficulty);
                LevelReport {
                    difficulty,
                    attempts: tally.attempts,
                    correct: tally.correct,
                    accuracy: tally.accuracy(),
                }
            })
            .collect();

        let elapsed = completed_at.signed_duration_since(self.started_at);
        SessionSummary {
            started_at: self.started_at,
            completed_at,
            elapsed_secs: elapsed.num_seconds().max(0),
            total: self.total(),
            correct: self.correct,
            incorrect: self.incorrect,
            accuracy: Accuracy::from_counts(self.correct, self.total()),
            levels,
        }
    }
}

//
// ─── SUMMARY ──────────────────────────────────────────────────────────────────
//

/// Per-level line of the end-of-session report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelReport {
    pub difficulty: Difficulty,
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: Accuracy,
}

/// Aggregate report for a finished (or interrupted) session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub elapsed_secs: i64,
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: Accuracy,
    /// One entry per level, easiest first.
    pub levels: Vec<LevelReport>,
}

impl SessionSummary {
    #[must_use]
    pub fn level(&self, difficulty: Difficulty) -> Option<&LevelReport> {
        self.levels.iter().find(|l| l.difficulty == difficulty)
    }
}
