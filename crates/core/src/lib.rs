#![forbid(unsafe_code)]

//! Domain core of the study quiz: chunking, TF-IDF retrieval, question
//! generation, answer scoring and adaptive difficulty. No I/O happens here.

pub mod chunker;
pub mod model;
pub mod question;
pub mod retrieval;
pub mod scoring;
pub mod text;
pub mod time;
pub mod vector;

pub use chunker::{ChunkBounds, ChunkError, chunk_passages};
pub use question::{QuestionError, QuestionGenerator};
pub use retrieval::{LengthBands, Retrieval, RetrievalError, Retriever};
pub use scoring::{AnswerScorer, Score, ScoreError};
pub use time::Clock;
pub use vector::{CorpusIndex, Query, Ranked, TfIdfIndex, TfIdfVectorizer, Vectorizer};
