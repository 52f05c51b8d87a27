//! Terminal side of the quiz: reading answers, printing questions, feedback
//! and the final summary.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use services::{AnswerOutcome, AnswerSource, RunOutcome, SessionObserver, SessionProgress};
use tutor_core::model::{Question, SessionSummary};

use crate::cli::OutputFormat;

/// Reads one answer per line.
pub struct LineAnswers<R> {
    reader: R,
}

impl<R: BufRead> LineAnswers<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> AnswerSource for LineAnswers<R> {
    fn next_answer(&mut self, _question: &Question) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

/// Prints questions and, unless quiet, progress and feedback.
///
/// Hooks cannot fail, so the first write error is kept and returned by
/// [`Console::finish`].
pub struct Console<W> {
    out: W,
    quiet: bool,
    error: Option<io::Error>,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            error: None,
        }
    }

    /// # Errors
    ///
    /// Returns the first write error seen while the quiz ran.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = write(&mut self.out).and_then(|()| self.out.flush()) {
            self.error = Some(err);
        }
    }
}

impl<W: Write> SessionObserver for Console<W> {
    fn on_question(&mut self, progress: &SessionProgress, question: &Question) {
        let quiet = self.quiet;
        self.emit(|out| {
            if !quiet {
                writeln!(
                    out,
                    "\nQuestion {}/{} [{}]",
                    progress.number, progress.total, progress.difficulty
                )?;
            }
            writeln!(out, "{}", question.prompt)?;
            write!(out, "> ")
        });
    }

    fn on_answer(&mut self, question: &Question, outcome: &AnswerOutcome) {
        if self.quiet {
            return;
        }
        self.emit(|out| {
            if outcome.is_correct() {
                writeln!(out, "Correct! (similarity {:.2})", outcome.score.similarity)?;
            } else {
                writeln!(
                    out,
                    "Not quite. The answer was \"{}\" (similarity {:.2})",
                    question.answer, outcome.score.similarity
                )?;
            }
            let transition = outcome.transition;
            if transition.changed() {
                writeln!(out, "Difficulty: {} -> {}", transition.from, transition.to)?;
            }
            Ok(())
        });
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    ended_early: bool,
    #[serde(flatten)]
    summary: &'a SessionSummary,
}

/// Write the end-of-session report.
///
/// # Errors
///
/// Returns write or serialization errors.
pub fn render_summary(
    out: &mut impl Write,
    summary: &SessionSummary,
    outcome: RunOutcome,
    format: OutputFormat,
) -> io::Result<()> {
    let ended_early = matches!(outcome, RunOutcome::EndedEarly { .. });
    match format {
        OutputFormat::Json => {
            let report = JsonReport {
                ended_early,
                summary,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            writeln!(out)?;
            if ended_early {
                writeln!(out, "Input ended early; partial results follow.")?;
            }
            writeln!(out, "Session summary")?;
            writeln!(out, "  Questions: {}", summary.total)?;
            writeln!(out, "  Correct:   {}", summary.correct)?;
            writeln!(out, "  Incorrect: {}", summary.incorrect)?;
            writeln!(out, "  Accuracy:  {}", summary.accuracy)?;
            writeln!(out, "  By difficulty:")?;
            for level in &summary.levels {
                writeln!(
                    out,
                    "    {:<6}  {}/{}  {}",
                    level.difficulty, level.correct, level.attempts, level.accuracy
                )?;
            }
            writeln!(out, "  Elapsed:   {}s", summary.elapsed_secs)
        }
    }
}
