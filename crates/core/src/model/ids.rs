use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a passage in the chunked corpus (0-based).
///
/// Ordering follows corpus order, which is what retrieval uses to break ties.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassageId(usize);

impl PassageId {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying corpus index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Column of a term in the corpus vocabulary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(u32);

impl TermId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PassageId({})", self.0)
    }
}

impl fmt::Debug for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TermId({})", self.0)
    }
}

impl fmt::Display for PassageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_ids_order_by_corpus_position() {
        let mut ids = vec![PassageId::new(3), PassageId::new(0), PassageId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![PassageId::new(0), PassageId::new(2), PassageId::new(3)]);
    }

    #[test]
    fn passage_id_display_is_bare_index() {
        assert_eq!(PassageId::new(7).to_string(), "7");
        assert_eq!(format!("{:?}", PassageId::new(7)), "PassageId(7)");
    }
}
