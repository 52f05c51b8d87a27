//! Fill-in-the-blank question generation.

use thiserror::Error;
use tracing::warn;

use crate::model::{BLANK, Difficulty, MaskStrategy, Passage, PassageId, Question};
use crate::text::{TermSpan, char_len, content_terms, split_sentences, words};
use crate::vector::CorpusIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("sentence has no content term to mask")]
    NoMaskableTerm,

    #[error("passage {passage} has no words to mask")]
    NothingToMask { passage: PassageId },
}

/// Turns passages into questions using the index's term weights.
pub struct QuestionGenerator<'a> {
    index: &'a dyn CorpusIndex,
}

impl<'a> QuestionGenerator<'a> {
    #[must_use]
    pub fn new(index: &'a dyn CorpusIndex) -> Self {
        Self { index }
    }

    /// Builds a question from the passage's longest sentence.
    ///
    /// The blank replaces the sentence's most distinctive term. Sentences made
    /// only of stop words fall back to the longest word, with a warning.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NothingToMask` when the passage has no word at all.
    pub fn generate(
        &self,
        passage: &Passage,
        difficulty: Difficulty,
    ) -> Result<Question, QuestionError> {
        let nothing = QuestionError::NothingToMask {
            passage: passage.id(),
        };
        let sentence = carrier_sentence(passage.text()).ok_or_else(|| nothing.clone())?;

        let (occurrences, strategy) = match self.distinctive_term(passage.id(), sentence) {
            Ok(terms) => (terms, MaskStrategy::DistinctiveTerm),
            Err(QuestionError::NoMaskableTerm) => {
                warn!(
                    passage = %passage.id(),
                    "no content term in the carrier sentence; masking the longest word"
                );
                let words = longest_word(sentence).ok_or(nothing)?;
                (words, MaskStrategy::LongestWord)
            }
            Err(err) => return Err(err),
        };

        let answer = occurrences[0].term.clone();
        Ok(Question {
            passage: passage.id(),
            prompt: mask(sentence, &occurrences),
            answer,
            difficulty,
            strategy,
        })
    }

    /// Occurrences of the highest-weighted content term in `sentence`.
    ///
    /// Ties go to the term that appears first.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoMaskableTerm` when the sentence has only stop words.
    pub fn distinctive_term(
        &self,
        passage: PassageId,
        sentence: &str,
    ) -> Result<Vec<TermSpan>, QuestionError> {
        let candidates = content_terms(sentence);
        let mut best: Option<(&TermSpan, f64)> = None;
        for candidate in &candidates {
            let weight = self.index.term_weight(passage, &candidate.term);
            if best.is_none_or(|(_, top)| weight > top) {
                best = Some((candidate, weight));
            }
        }

        let (target, _) = best.ok_or(QuestionError::NoMaskableTerm)?;
        Ok(candidates
            .iter()
            .filter(|c| c.term == target.term)
            .cloned()
            .collect())
    }
}

/// The sentence with the most words; the first one wins ties.
#[must_use]
pub fn carrier_sentence(text: &str) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for sentence in split_sentences(text) {
        let count = sentence.split_whitespace().count();
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((sentence, count));
        }
    }
    best.map(|(sentence, _)| sentence)
}

fn longest_word(sentence: &str) -> Option<Vec<TermSpan>> {
    let all = words(sentence);
    let mut best: Option<&TermSpan> = None;
    for word in &all {
        if best.is_none_or(|top| char_len(&word.term) > char_len(&top.term)) {
            best = Some(word);
        }
    }
    let target = best?.term.clone();
    Some(all.into_iter().filter(|w| w.term == target).collect())
}

fn mask(sentence: &str, occurrences: &[TermSpan]) -> String {
    let mut out = String::with_capacity(sentence.len());
    let mut cursor = 0;
    for occurrence in occurrences {
        out.push_str(&sentence[cursor..occurrence.span.start]);
        out.push_str(BLANK);
        cursor = occurrence.span.end;
    }
    out.push_str(&sentence[cursor..]);
    out
}
