//! Splits raw notes into passages bounded by a character-length window.
//!
//! Paragraphs (blank-line separated) and sentences are the preferred cut
//! points. Whitespace inside a passage is normalized to single spaces.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::model::{Passage, PassageId};
use crate::text::{char_len, is_sentence_end};

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChunkError {
    #[error("invalid chunk bounds: min ({min_len}) must be at least 1 and at most max ({max_len})")]
    InvalidBounds { min_len: usize, max_len: usize },

    #[error("notes contain no usable text")]
    EmptyCorpus,

    #[error("notes are {length} characters long, shorter than the minimum chunk length {min_len}")]
    CorpusTooShort { length: usize, min_len: usize },
}

impl ChunkError {
    /// True for the errors meaning "the notes produced no usable passage".
    #[must_use]
    pub fn is_empty_corpus(&self) -> bool {
        matches!(self, Self::EmptyCorpus | Self::CorpusTooShort { .. })
    }
}

//
// ─── BOUNDS ────────────────────────────────────────────────────────────────────
//

/// Inclusive `[min_len, max_len]` passage length window, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
    min_len: usize,
    max_len: usize,
}

impl ChunkBounds {
    pub const DEFAULT_MIN: usize = 50;
    pub const DEFAULT_MAX: usize = 300;

    /// # Errors
    ///
    /// Returns `ChunkError::InvalidBounds` unless `1 <= min_len <= max_len`.
    pub fn new(min_len: usize, max_len: usize) -> Result<Self, ChunkError> {
        if min_len == 0 || min_len > max_len {
            return Err(ChunkError::InvalidBounds { min_len, max_len });
        }
        Ok(Self { min_len, max_len })
    }

    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for ChunkBounds {
    fn default() -> Self {
        Self {
            min_len: Self::DEFAULT_MIN,
            max_len: Self::DEFAULT_MAX,
        }
    }
}

//
// ─── CHUNKING ──────────────────────────────────────────────────────────────────
//

/// Splits `text` into passages.
///
/// Every passage except possibly the last has a length inside `bounds`. Short
/// paragraphs are merged forward, long ones are cut at the last sentence end
/// that keeps the passage at or above the minimum, and words that cannot fit
/// are split. Passages without any alphanumeric character are dropped.
///
/// # Errors
///
/// - `EmptyCorpus` when no usable passage remains
/// - `CorpusTooShort` when the whole text is shorter than `bounds.min_len()`
pub fn chunk_passages(text: &str, bounds: ChunkBounds) -> Result<Vec<Passage>, ChunkError> {
    let mut packer = Packer::new(bounds);
    for word in segment_words(text, bounds.max_len) {
        packer.push(word);
    }

    let passages: Vec<Passage> = packer
        .finish()
        .into_iter()
        .filter(|chunk| chunk.chars().any(char::is_alphanumeric))
        .enumerate()
        .map(|(idx, chunk)| Passage::new(PassageId::new(idx), chunk))
        .collect();

    match passages.as_slice() {
        [] => Err(ChunkError::EmptyCorpus),
        [only] if only.length() < bounds.min_len => Err(ChunkError::CorpusTooShort {
            length: only.length(),
            min_len: bounds.min_len,
        }),
        _ => Ok(passages),
    }
}

#[derive(Debug, Clone)]
struct Word {
    text: String,
    len: usize,
    sentence_end: bool,
    paragraph_end: bool,
}

/// Flattens the text into words tagged with the boundaries that follow them.
/// Words longer than `max_len` come out as `max_len`-sized pieces.
fn segment_words(text: &str, max_len: usize) -> Vec<Word> {
    let mut out = Vec::new();
    for paragraph in PARAGRAPH_BREAK.split(text) {
        let raw: Vec<&str> = paragraph.split_whitespace().collect();
        let last = raw.len().saturating_sub(1);
        for (idx, token) in raw.iter().enumerate() {
            let sentence_end = token.chars().last().is_some_and(is_sentence_end);
            let paragraph_end = idx == last;
            let chars: Vec<char> = token.chars().collect();
            let pieces = chars.chunks(max_len).count();
            for (piece_idx, piece) in chars.chunks(max_len).enumerate() {
                let is_last_piece = piece_idx + 1 == pieces;
                out.push(Word {
                    text: piece.iter().collect(),
                    len: piece.len(),
                    sentence_end: sentence_end && is_last_piece,
                    paragraph_end: paragraph_end && is_last_piece,
                });
            }
        }
    }
    out
}

struct Packer {
    bounds: ChunkBounds,
    current: Vec<Word>,
    current_len: usize,
    done: Vec<String>,
}

impl Packer {
    fn new(bounds: ChunkBounds) -> Self {
        Self {
            bounds,
            current: Vec::new(),
            current_len: 0,
            done: Vec::new(),
        }
    }

    fn joined_len(&self, extra: usize) -> usize {
        if self.current.is_empty() {
            extra
        } else {
            self.current_len + 1 + extra
        }
    }

    fn push(&mut self, mut word: Word) {
        while !self.current.is_empty() && self.joined_len(word.len) > self.bounds.max_len {
            if self.current_len >= self.bounds.min_len {
                self.flush_at_sentence();
                continue;
            }

            // Still below the minimum: top the passage up to exactly max_len
            // with the head of this word and carry the rest over.
            let available = self.bounds.max_len - self.current_len - 1;
            if available == 0 {
                // Only the separator fits, which happens when min_len == max_len.
                self.flush_padded();
                continue;
            }
            let head: String = word.text.chars().take(available).collect();
            let tail: String = word.text.chars().skip(available).collect();
            self.append(Word {
                text: head,
                len: available,
                sentence_end: false,
                paragraph_end: false,
            });
            self.flush_all();
            word = Word {
                len: word.len - available,
                text: tail,
                ..word
            };
        }

        let paragraph_end = word.paragraph_end;
        self.append(word);
        if paragraph_end && self.current_len >= self.bounds.min_len {
            self.flush_all();
        }
    }

    fn append(&mut self, word: Word) {
        self.current_len = self.joined_len(word.len);
        self.current.push(word);
    }

    /// Emits the longest prefix ending on a sentence boundary that is at least
    /// `min_len` long, or the whole buffer when there is none.
    fn flush_at_sentence(&mut self) {
        let mut prefix_len = 0;
        let mut cut = None;
        for (idx, word) in self.current.iter().enumerate().take(self.current.len() - 1) {
            prefix_len += if idx == 0 { word.len } else { word.len + 1 };
            if word.sentence_end && prefix_len >= self.bounds.min_len {
                cut = Some((idx, prefix_len));
            }
        }

        let Some((idx, emitted_len)) = cut else {
            self.flush_all();
            return;
        };

        let emitted: Vec<Word> = self.current.drain(..=idx).collect();
        self.done.push(join(&emitted));
        self.current_len -= emitted_len + 1;
    }

    /// Emits the buffer with a trailing separator, exactly `current_len + 1` long.
    fn flush_padded(&mut self) {
        let mut text = join(&self.current);
        text.push(' ');
        self.done.push(text);
        self.current.clear();
        self.current_len = 0;
    }

    fn flush_all(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.done.push(join(&self.current));
        self.current.clear();
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() {
            let tail = join(&self.current);
            let tail_len = self.current_len;
            let mergeable = self.done.last().is_some_and(|prev| {
                tail_len < self.bounds.min_len && char_len(prev) + 1 + tail_len <= self.bounds.max_len
            });
            if mergeable {
                if let Some(prev) = self.done.last_mut() {
                    prev.push(' ');
                    prev.push_str(&tail);
                }
            } else {
                self.done.push(tail);
            }
        }
        self.done
    }
}

fn join(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
