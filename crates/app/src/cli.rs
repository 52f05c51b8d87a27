use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use services::{ConfigError, QuizConfig};
use tutor_core::{AnswerScorer, ChunkBounds};

#[derive(Debug, Parser)]
#[command(name = "tutor")]
#[command(about = "Adaptive fill-in-the-blank quiz over plain-text notes", long_about = None)]
#[command(version)]
#[command(
    after_help = "End of input (Ctrl-D) stops the quiz and prints the partial summary. \
Ctrl-C aborts immediately without a summary."
)]
pub struct Cli {
    /// Notes file to quiz on
    #[arg(long, env = "TUTOR_NOTES")]
    pub notes: PathBuf,

    /// Number of questions to ask
    #[arg(long, env = "TUTOR_NUM_QUESTIONS", default_value_t = QuizConfig::DEFAULT_NUM_QUESTIONS)]
    pub num_questions: usize,

    /// Bias retrieval toward passages about this phrase
    #[arg(long)]
    pub topic: Option<String>,

    /// Only ask about passages that contain the topic
    #[arg(long, requires = "topic")]
    pub strict_topic: bool,

    /// Minimum passage length in characters
    #[arg(long, env = "TUTOR_MIN_CHUNK_LENGTH", default_value_t = ChunkBounds::DEFAULT_MIN)]
    pub min_chunk_length: usize,

    /// Maximum passage length in characters
    #[arg(long, env = "TUTOR_MAX_CHUNK_LENGTH", default_value_t = ChunkBounds::DEFAULT_MAX)]
    pub max_chunk_length: usize,

    /// Similarity an answer needs to count as correct, in [0, 1]
    #[arg(long, env = "TUTOR_THRESHOLD", default_value_t = AnswerScorer::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level (defaults to warn, or error with --quiet)
    #[arg(long, value_enum, env = "TUTOR_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Only print questions and the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug)]
pub enum ArgsError {
    UnreadableNotes { path: PathBuf, source: io::Error },
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::UnreadableNotes { path, source } => {
                write!(f, "cannot read notes file {}: {source}", path.display())
            }
            ArgsError::Config(err) => write!(f, "{err}"),
        }
    }
}

// Display already carries the cause; no source chain.
impl std::error::Error for ArgsError {}

impl From<ConfigError> for ArgsError {
    fn from(err: ConfigError) -> Self {
        ArgsError::Config(err)
    }
}

impl Cli {
    /// Effective log level: explicit flag, else error when quiet, else warn.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or(if self.quiet {
            LogLevel::Error
        } else {
            LogLevel::Warn
        })
    }

    /// # Errors
    ///
    /// Returns `ArgsError::Config` when the options do not form a valid quiz.
    pub fn quiz_config(&self) -> Result<QuizConfig, ArgsError> {
        let bounds = ChunkBounds::new(self.min_chunk_length, self.max_chunk_length)
            .map_err(ConfigError::from)?;
        let mut config = QuizConfig::default()
            .with_num_questions(self.num_questions)
            .with_strict_topic(self.strict_topic)
            .with_bounds(bounds)
            .with_threshold(self.threshold);
        if let Some(topic) = &self.topic {
            config = config.with_topic(topic.as_str());
        }
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ArgsError::UnreadableNotes` when the file is missing or not UTF-8 text.
    pub fn read_notes(&self) -> Result<String, ArgsError> {
        read_notes(&self.notes)
    }
}

fn read_notes(path: &Path) -> Result<String, ArgsError> {
    std::fs::read_to_string(path).map_err(|source| ArgsError::UnreadableNotes {
        path: path.to_path_buf(),
        source,
    })
}
