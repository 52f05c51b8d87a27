use crate::model::TermId;

/// Sparse vector keyed by term id, entries sorted by id with no duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    /// Builds a vector from unsorted `(term, weight)` pairs. Duplicate terms are summed.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (TermId, f64)>) -> Self {
        let mut entries: Vec<(TermId, f64)> = pairs.into_iter().collect();
        entries.sort_by_key(|(term, _)| *term);

        let mut merged: Vec<(TermId, f64)> = Vec::with_capacity(entries.len());
        for (term, weight) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == term => *acc += weight,
                _ => merged.push((term, weight)),
            }
        }
        Self { entries: merged }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn get(&self, term: TermId) -> f64 {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .map_or(0.0, |idx| self.entries[idx].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, f64)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scales to unit length. A zero vector stays zero.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }

    #[must_use]
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity; 0.0 when either side is a zero vector.
    #[must_use]
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }
        self.dot(other) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(pairs: &[(u32, f64)]) -> SparseVector {
        SparseVector::from_pairs(pairs.iter().map(|&(t, w)| (TermId::new(t), w)))
    }

    #[test]
    fn duplicate_terms_are_summed_and_sorted() {
        let vec = v(&[(3, 1.0), (1, 2.0), (3, 0.5)]);
        assert_eq!(vec.nnz(), 2);
        assert_eq!(vec.get(TermId::new(1)), 2.0);
        assert_eq!(vec.get(TermId::new(3)), 1.5);
        assert_eq!(vec.get(TermId::new(2)), 0.0);
    }

    #[test]
    fn dot_only_counts_shared_terms() {
        let a = v(&[(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = v(&[(2, 4.0), (5, 1.0), (9, 7.0)]);
        assert!((a.dot(&b) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_has_unit_norm() {
        let a = v(&[(0, 3.0), (1, 4.0)]).normalized();
        assert!((a.norm() - 1.0).abs() < 1e-12);
        assert!((a.get(TermId::new(0)) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = v(&[(0, 1.0)]);
        assert_eq!(a.cosine(&SparseVector::default()), 0.0);
        assert!((a.cosine(&a) - 1.0).abs() < 1e-12);
    }
}
