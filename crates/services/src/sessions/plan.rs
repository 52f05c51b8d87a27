use std::fmt;

use tracing::{debug, warn};

use tutor_core::model::{Passage, PassageId};
use tutor_core::{CorpusIndex, LengthBands, Query, TfIdfVectorizer, Vectorizer, chunk_passages};

use crate::config::QuizConfig;
use crate::error::QuizError;

/// Everything derived from the notes before the first question: passages,
/// the index over them, the length bands and the passages a quiz may use.
///
/// Built once per run and read-only afterwards.
pub struct QuizPlan {
    passages: Vec<Passage>,
    index: Box<dyn CorpusIndex>,
    bands: LengthBands,
    eligible: Vec<PassageId>,
    topic: Option<String>,
}

impl QuizPlan {
    /// Plan a quiz over `notes` with the TF-IDF vectorizer.
    ///
    /// # Errors
    ///
    /// See [`QuizPlan::build_with`].
    pub fn build(notes: &str, config: &QuizConfig) -> Result<Self, QuizError> {
        Self::build_with(&TfIdfVectorizer, notes, config)
    }

    /// Plan a quiz with any vectorizer.
    ///
    /// # Errors
    ///
    /// - `QuizError::Config` for invalid settings.
    /// - `QuizError::Corpus` when the notes yield no passage.
    /// - `QuizError::TopicNotFound` when the strict topic filter leaves nothing.
    pub fn build_with<V>(vectorizer: &V, notes: &str, config: &QuizConfig) -> Result<Self, QuizError>
    where
        V: Vectorizer,
        V::Index: 'static,
    {
        config.validate()?;

        let passages = chunk_passages(notes, config.bounds())?;
        let index = vectorizer.build(&passages);
        let bands = LengthBands::from_passages(&passages);
        debug!(
            passages = passages.len(),
            vocabulary = index.dimension(),
            easy_max = bands.easy_max(),
            medium_max = bands.medium_max(),
            "planned quiz"
        );

        let topic = config.topic().map(str::to_owned);
        if let Some(topic) = topic.as_deref()
            && !index.knows_any(topic)
        {
            warn!(topic, "topic shares no terms with the notes; passages will be used in order");
        }

        let eligible = match topic.as_deref() {
            Some(topic) if config.strict_topic() => {
                let needle = topic.to_lowercase();
                let matching: Vec<PassageId> = passages
                    .iter()
                    .filter(|p| p.text().to_lowercase().contains(&needle))
                    .map(Passage::id)
                    .collect();
                if matching.is_empty() {
                    return Err(QuizError::TopicNotFound {
                        topic: topic.to_owned(),
                    });
                }
                matching
            }
            _ => passages.iter().map(Passage::id).collect(),
        };

        Ok(Self {
            passages,
            index: Box::new(index),
            bands,
            eligible,
            topic,
        })
    }

    #[must_use]
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    #[must_use]
    pub fn passage(&self, id: PassageId) -> Option<&Passage> {
        self.passages.get(id.index())
    }

    #[must_use]
    pub fn index(&self) -> &dyn CorpusIndex {
        self.index.as_ref()
    }

    #[must_use]
    pub fn bands(&self) -> LengthBands {
        self.bands
    }

    /// Passages questions may be drawn from, in corpus order.
    #[must_use]
    pub fn eligible(&self) -> &[PassageId] {
        &self.eligible
    }

    #[must_use]
    pub fn is_eligible(&self, id: PassageId) -> bool {
        self.eligible.binary_search(&id).is_ok()
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Retrieval query: the topic when one is set, the generic probe otherwise.
    #[must_use]
    pub fn query(&self) -> Query<'_> {
        self.topic.as_deref().map_or(Query::Probe, Query::Topic)
    }
}

impl fmt::Debug for QuizPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizPlan")
            .field("passages_len", &self.passages.len())
            .field("dimension", &self.index.dimension())
            .field("bands", &self.bands)
            .field("eligible_len", &self.eligible.len())
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}
