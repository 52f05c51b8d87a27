use serde::Serialize;

use crate::model::ids::PassageId;
use crate::text::char_len;

/// A contiguous span of the notes treated as one retrievable unit.
///
/// Created once by the chunker and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    id: PassageId,
    text: String,
    length: usize,
}

impl Passage {
    #[must_use]
    pub fn new(id: PassageId, text: impl Into<String>) -> Self {
        let text = text.into();
        let length = char_len(&text);
        Self { id, text, length }
    }

    #[must_use]
    pub fn id(&self) -> PassageId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }
}
