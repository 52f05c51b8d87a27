use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Three-level difficulty used to pick the passage length band.
///
/// Levels are ordered `Easy < Medium < Hard` and only ever move one step at a time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Position in [`Difficulty::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// One level up, clamped at `Hard`.
    #[must_use]
    pub fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// One level down, clamped at `Easy`.
    #[must_use]
    pub fn easier(self) -> Self {
        match self {
            Difficulty::Easy | Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    /// Next level after an answer: up when correct, down otherwise.
    #[must_use]
    pub fn step(self, correct: bool) -> Self {
        if correct { self.harder() } else { self.easier() }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

//
// ─── CONTROLLER ───────────────────────────────────────────────────────────────
//

/// A single controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Difficulty,
    pub to: Difficulty,
}

impl Transition {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Adaptive difficulty state for one session. Starts at `Medium`.
#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    current: Difficulty,
}

impl DifficultyController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_at(level: Difficulty) -> Self {
        Self { current: level }
    }

    #[must_use]
    pub fn current(&self) -> Difficulty {
        self.current
    }

    /// Applies one answer and returns the transition taken.
    pub fn record(&mut self, correct: bool) -> Transition {
        let from = self.current;
        self.current = from.step(correct);
        Transition {
            from,
            to: self.current,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
