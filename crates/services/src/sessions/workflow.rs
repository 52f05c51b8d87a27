use std::io;

use tracing::{debug, info};

use tutor_core::Clock;
use tutor_core::model::{Question, SessionStats, SessionSummary};

use super::plan::QuizPlan;
use super::progress::SessionProgress;
use super::service::{AnswerOutcome, QuizSession};
use crate::config::QuizConfig;
use crate::error::QuizError;

/// Where answers come from.
pub trait AnswerSource {
    /// Answer to `question`, or `Ok(None)` once input has ended.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when reading fails.
    fn next_answer(&mut self, question: &Question) -> io::Result<Option<String>>;
}

/// Notified as the loop advances. Both hooks default to doing nothing.
pub trait SessionObserver {
    fn on_question(&mut self, _progress: &SessionProgress, _question: &Question) {}

    fn on_answer(&mut self, _question: &Question, _outcome: &AnswerOutcome) {}
}

impl SessionObserver for () {}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every requested question was asked and answered.
    Completed,
    /// Input ended before the last answer.
    EndedEarly { answered: u32 },
}

/// Drives a [`QuizSession`] for the configured number of questions.
#[derive(Debug)]
pub struct QuizLoop<'p> {
    session: QuizSession<'p>,
    num_questions: usize,
    asked: usize,
    clock: Clock,
}

impl<'p> QuizLoop<'p> {
    /// # Errors
    ///
    /// Returns `QuizError::Config` when `config` does not validate.
    pub fn new(plan: &'p QuizPlan, config: &QuizConfig) -> Result<Self, QuizError> {
        let scorer = config.validate()?;
        Ok(Self {
            session: QuizSession::new(plan, scorer),
            num_questions: config.num_questions(),
            asked: 0,
            clock: Clock::default(),
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Fresh counters stamped with the loop's clock.
    #[must_use]
    pub fn begin(&self) -> SessionStats {
        SessionStats::new(self.clock.now())
    }

    /// Ask questions until the requested count is reached or input ends.
    ///
    /// # Errors
    ///
    /// - `QuizError::NoQuestions` when the plan cannot produce a question.
    /// - `QuizError::Input` when the answer source fails.
    pub fn run(
        &mut self,
        source: &mut dyn AnswerSource,
        observer: &mut dyn SessionObserver,
        stats: &mut SessionStats,
    ) -> Result<RunOutcome, QuizError> {
        while self.asked < self.num_questions {
            let question = self.session.next_question()?;
            self.asked += 1;
            observer.on_question(&self.progress(), &question);

            let Some(submitted) = source.next_answer(&question)? else {
                info!(answered = stats.total(), "input ended before the last question");
                return Ok(RunOutcome::EndedEarly {
                    answered: stats.total(),
                });
            };

            let outcome = self.session.answer(&question, &submitted, stats);
            observer.on_answer(&question, &outcome);
        }

        debug!(asked = self.asked, "quiz completed");
        Ok(RunOutcome::Completed)
    }

    /// Summary of `stats` as of now.
    #[must_use]
    pub fn finish(&self, stats: &SessionStats) -> SessionSummary {
        stats.finalize(self.clock.now())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            number: self.asked,
            total: self.num_questions,
            difficulty: self.session.difficulty(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession<'p> {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::ChunkBounds;
    use tutor_core::model::Difficulty;
    use tutor_core::time::fixed_now;

    const NOTES: &str = "Photosynthesis converts light into chemical energy inside chloroplasts.\n\n\
Mitochondria release energy from glucose through cellular respiration.\n\n\
Ribosomes translate messenger RNA into chains of amino acids.";

    /// Answers every question correctly until `limit` answers were given.
    struct Oracle {
        limit: usize,
        given: usize,
    }

    impl AnswerSource for Oracle {
        fn next_answer(&mut self, question: &Question) -> io::Result<Option<String>> {
            if self.given == self.limit {
                return Ok(None);
            }
            self.given += 1;
            Ok(Some(question.answer.clone()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        progress: Vec<SessionProgress>,
        answers: Vec<bool>,
    }

    impl SessionObserver for Recorder {
        fn on_question(&mut self, progress: &SessionProgress, _question: &Question) {
            self.progress.push(*progress);
        }

        fn on_answer(&mut self, _question: &Question, outcome: &AnswerOutcome) {
            self.answers.push(outcome.is_correct());
        }
    }

    fn config(num_questions: usize) -> QuizConfig {
        QuizConfig::default()
            .with_num_questions(num_questions)
            .with_bounds(ChunkBounds::new(20, 200).unwrap())
    }

    #[test]
    fn loop_asks_the_requested_number_of_questions() {
        let config = config(4);
        let plan = QuizPlan::build(NOTES, &config).unwrap();
        let mut quiz = QuizLoop::new(&plan, &config)
            .unwrap()
            .with_clock(Clock::fixed(fixed_now()));
        let mut stats = quiz.begin();
        let mut recorder = Recorder::default();

        let outcome = quiz
            .run(&mut Oracle { limit: 10, given: 0 }, &mut recorder, &mut stats)
            .unwrap();

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(stats.total(), 4);
        assert_eq!(recorder.answers, vec![true; 4]);
        let numbers: Vec<usize> = recorder.progress.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(recorder.progress[0].difficulty, Difficulty::Medium);
        assert_eq!(recorder.progress[1].difficulty, Difficulty::Hard);
        assert!(recorder.progress.iter().all(|p| p.total == 4));
    }

    #[test]
    fn end_of_input_ends_the_run_early() {
        let config = config(5);
        let plan = QuizPlan::build(NOTES, &config).unwrap();
        let mut quiz = QuizLoop::new(&plan, &config)
            .unwrap()
            .with_clock(Clock::fixed(fixed_now()));
        let mut stats = quiz.begin();

        let outcome = quiz
            .run(&mut Oracle { limit: 2, given: 0 }, &mut (), &mut stats)
            .unwrap();

        assert_eq!(outcome, RunOutcome::EndedEarly { answered: 2 });
        let summary = quiz.finish(&stats);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.started_at, fixed_now());
        assert_eq!(summary.completed_at, fixed_now());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let plan = QuizPlan::build(NOTES, &config(1)).unwrap();
        let err = QuizLoop::new(&plan, &config(1).with_threshold(f64::NAN)).unwrap_err();
        assert!(err.is_config());
    }
}
