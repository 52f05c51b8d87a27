use tutor_core::model::Difficulty;

/// Where the loop stands when a question is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 1-based number of the question being asked.
    pub number: usize,
    pub total: usize,
    pub difficulty: Difficulty,
}
