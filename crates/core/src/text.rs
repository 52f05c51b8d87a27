//! Text helpers shared by the chunker, the vectorizer and the question generator.
//!
//! Everything that decides what a "term" is lives here so the index and the
//! masking step always agree on token boundaries.

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of two or more word characters. Single letters never become terms.
static TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid term regex"));

/// Any run of word characters, used when a sentence has no content term.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "either", "else", "etc", "every", "few", "for", "from", "further",
        "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
        "himself", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its",
        "itself", "just", "may", "me", "might", "more", "most", "much", "must", "my",
        "myself", "neither", "no", "nor", "not", "now", "of", "off", "on", "once", "one",
        "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
        "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
        "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
        "thus", "to", "too", "under", "until", "up", "upon", "us", "very", "was", "we",
        "were", "what", "when", "where", "whether", "which", "while", "who", "whom", "whose",
        "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// A term occurrence inside a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSpan {
    /// Lower-cased term.
    pub term: String,
    /// Byte range of the occurrence in the source text.
    pub span: Range<usize>,
}

#[must_use]
pub fn is_stop_word(term: &str) -> bool {
    STOP_WORDS.contains(term)
}

/// Lower-cased content terms of `text`, stop words removed, in order of appearance.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    content_terms(text).into_iter().map(|t| t.term).collect()
}

/// Content term occurrences (stop words removed) with their byte spans.
#[must_use]
pub fn content_terms(text: &str) -> Vec<TermSpan> {
    TERM_RE
        .find_iter(text)
        .map(|m| TermSpan {
            term: m.as_str().to_lowercase(),
            span: m.range(),
        })
        .filter(|t| !is_stop_word(&t.term))
        .collect()
}

/// Every word occurrence, stop words included.
#[must_use]
pub fn words(text: &str) -> Vec<TermSpan> {
    WORD_RE
        .find_iter(text)
        .map(|m| TermSpan {
            term: m.as_str().to_lowercase(),
            span: m.range(),
        })
        .collect()
}

/// Splits text after `.`, `!` or `?` when followed by whitespace.
///
/// Returned sentences are trimmed and never empty.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_sentence_end(ch) {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek() {
            if next.is_whitespace() {
                push_trimmed(&mut sentences, &text[start..next_idx]);
                start = next_idx;
            }
        } else {
            push_trimmed(&mut sentences, &text[start..idx + ch.len_utf8()]);
            start = text.len();
        }
    }
    if start < text.len() {
        push_trimmed(&mut sentences, &text[start..]);
    }
    sentences
}

#[must_use]
pub fn is_sentence_end(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Number of `char`s, the unit passage lengths are measured in.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece);
    }
}
