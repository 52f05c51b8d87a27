use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::model::{Passage, PassageId, TermId};
use crate::text::tokenize;

use super::{CorpusIndex, Query, Ranked, SparseVector, Vectorizer};

/// Term-frequency × inverse-document-frequency vectorizer.
///
/// IDF uses add-one smoothing, `ln((1 + n) / (1 + df)) + 1`, so a term found in
/// every passage keeps a small positive weight instead of vanishing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfVectorizer;

impl Vectorizer for TfIdfVectorizer {
    type Index = TfIdfIndex;

    fn build(&self, passages: &[Passage]) -> TfIdfIndex {
        TfIdfIndex::build(passages)
    }
}

/// L2-normalized TF-IDF rows, one per passage, plus the shared IDF table.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, TermId>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
    centroid: SparseVector,
}

impl TfIdfIndex {
    #[must_use]
    pub fn build(passages: &[Passage]) -> Self {
        let docs: Vec<Vec<String>> = passages.iter().map(|p| tokenize(p.text())).collect();

        // Sorted assignment keeps term ids stable across runs.
        let terms: BTreeSet<&str> = docs.iter().flatten().map(String::as_str).collect();
        let vocabulary: HashMap<String, TermId> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_owned(), TermId::new(to_u32(idx))))
            .collect();

        let mut df = vec![0_u32; vocabulary.len()];
        for doc in &docs {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                if let Some(id) = vocabulary.get(term) {
                    df[id.value() as usize] += 1;
                }
            }
        }

        let n = docs.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + f64::from(d))).ln() + 1.0)
            .collect();

        let mut index = Self {
            vocabulary,
            idf,
            rows: Vec::with_capacity(docs.len()),
            centroid: SparseVector::default(),
        };
        index.rows = docs.iter().map(|doc| index.weigh(doc)).collect();
        index.centroid = SparseVector::from_pairs(index.rows.iter().flat_map(SparseVector::iter))
            .normalized();

        debug!(
            passages = index.rows.len(),
            vocabulary = index.vocabulary.len(),
            nonzero = index.rows.iter().map(SparseVector::nnz).sum::<usize>(),
            "built tf-idf index"
        );
        index
    }

    /// TF-IDF vector for arbitrary text; terms outside the vocabulary are ignored.
    #[must_use]
    pub fn embed(&self, text: &str) -> SparseVector {
        self.weigh(&tokenize(text))
    }

    /// Normalized row for a passage.
    #[must_use]
    pub fn row(&self, passage: PassageId) -> Option<&SparseVector> {
        self.rows.get(passage.index())
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        SparseVector::from_pairs(terms.iter().filter_map(|term| {
            self.vocabulary
                .get(term)
                .map(|&id| (id, self.idf[id.value() as usize]))
        }))
        .normalized()
    }
}

impl CorpusIndex for TfIdfIndex {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn rank(&self, query: Query<'_>) -> Vec<Ranked> {
        let embedded;
        let probe = match query {
            Query::Topic(text) => {
                embedded = self.embed(text);
                &embedded
            }
            Query::Probe => &self.centroid,
        };

        let mut ranked: Vec<Ranked> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| Ranked {
                passage: PassageId::new(idx),
                score: row.cosine(probe),
            })
            .collect();
        ranked.sort_by(Ranked::ranking_order);
        ranked
    }

    fn term_weight(&self, passage: PassageId, term: &str) -> f64 {
        match (self.row(passage), self.vocabulary.get(term)) {
            (Some(row), Some(&id)) => row.get(id),
            _ => 0.0,
        }
    }

    fn knows_any(&self, text: &str) -> bool {
        tokenize(text)
            .iter()
            .any(|term| self.vocabulary.contains_key(term))
    }
}

fn to_u32(idx: usize) -> u32 {
    u32::try_from(idx).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn idf(index: &TfIdfIndex, term: &str) -> Option<f64> {
        index
            .vocabulary
            .get(term)
            .map(|id| index.idf[id.value() as usize])
    }

    fn corpus(texts: &[&str]) -> Vec<Passage> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| Passage::new(PassageId::new(idx), *text))
            .collect()
    }

    #[test]
    fn every_passage_gets_one_row() {
        let passages = corpus(&["Cells divide by mitosis.", "Plants use photosynthesis.", "the of and"]);
        let index = TfIdfVectorizer.build(&passages);
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 6);
        assert!(index.row(PassageId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn idf_is_smoothed() {
        let passages = corpus(&["energy mass", "energy force"]);
        let index = TfIdfIndex::build(&passages);
        let shared = idf(&index, "energy").unwrap();
        let rare = idf(&index, "mass").unwrap();
        assert!((shared - 1.0).abs() < 1e-12);
        assert!((rare - ((3.0_f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn rows_are_unit_length() {
        let passages = corpus(&["gravity pulls mass toward mass", "light bends near gravity"]);
        let index = TfIdfIndex::build(&passages);
        for idx in 0..2 {
            let norm = index.row(PassageId::new(idx)).unwrap().norm();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn topic_ranks_matching_passage_first() {
        let passages = corpus(&[
            "Mitochondria produce ATP for the cell.",
            "Photosynthesis turns sunlight into glucose in chloroplasts.",
            "Ribosomes assemble proteins.",
        ]);
        let index = TfIdfIndex::build(&passages);
        let ranked = index.rank(Query::Topic("photosynthesis"));
        assert_eq!(ranked[0].passage, PassageId::new(1));
        assert!(ranked[0].score > 0.0);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn unknown_topic_ties_resolve_by_lowest_id() {
        let passages = corpus(&["alpha beta", "gamma delta", "epsilon zeta"]);
        let index = TfIdfIndex::build(&passages);
        assert!(!index.knows_any("quantum"));
        let ranked = index.rank(Query::Topic("quantum"));
        let ids: Vec<usize> = ranked.iter().map(|r| r.passage.index()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn probe_prefers_representative_passages() {
        let passages = corpus(&[
            "orbit",
            "planet orbit star planet",
            "planet star orbit",
        ]);
        let index = TfIdfIndex::build(&passages);
        let ranked = index.rank(Query::Probe);
        assert_ne!(ranked[0].passage, PassageId::new(0));
    }

    #[test]
    fn term_weight_reads_the_passage_row() {
        let passages = corpus(&["inertia inertia force", "force"]);
        let index = TfIdfIndex::build(&passages);
        let p0 = PassageId::new(0);
        assert!(index.term_weight(p0, "inertia") > index.term_weight(p0, "force"));
        assert_eq!(index.term_weight(PassageId::new(1), "inertia"), 0.0);
        assert_eq!(index.term_weight(p0, "missing"), 0.0);
        assert_eq!(index.term_weight(PassageId::new(9), "force"), 0.0);
    }

    proptest! {
        #[test]
        fn passage_text_ranks_itself_at_the_top(
            docs in proptest::collection::vec(
                proptest::collection::vec(
                    prop::sample::select(vec![
                        "atom", "bond", "cell", "dna", "enzyme", "force", "gene", "heat",
                        "ion", "joule", "kinetic", "lipid", "mass", "neuron",
                    ]),
                    1..12,
                ),
                1..10,
            )
        ) {
            let texts: Vec<String> = docs.iter().map(|d| d.join(" ")).collect();
            let passages: Vec<Passage> = texts
                .iter()
                .enumerate()
                .map(|(idx, t)| Passage::new(PassageId::new(idx), t.clone()))
                .collect();
            let index = TfIdfIndex::build(&passages);

            for passage in &passages {
                let ranked = index.rank(Query::Topic(passage.text()));
                let own = ranked.iter().find(|r| r.passage == passage.id()).unwrap().score;
                prop_assert!(own + 1e-9 >= ranked[0].score);
            }
        }
    }
}
