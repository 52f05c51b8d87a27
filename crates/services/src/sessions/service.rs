use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use tutor_core::model::{
    Difficulty, DifficultyController, Passage, PassageId, Question, SessionStats, Transition,
};
use tutor_core::{AnswerScorer, QuestionError, QuestionGenerator, Retriever, Score};

use super::plan::QuizPlan;
use crate::error::QuizError;

/// Result of scoring one answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerOutcome {
    pub score: Score,
    /// Difficulty move caused by this answer.
    pub transition: Transition,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.score.is_correct
    }
}

/// One quiz over a plan: picks passages, asks, scores and adapts difficulty.
pub struct QuizSession<'p> {
    plan: &'p QuizPlan,
    scorer: AnswerScorer,
    controller: DifficultyController,
    asked: HashSet<PassageId>,
    unusable: HashSet<PassageId>,
}

impl<'p> QuizSession<'p> {
    #[must_use]
    pub fn new(plan: &'p QuizPlan, scorer: AnswerScorer) -> Self {
        Self {
            plan,
            scorer,
            controller: DifficultyController::new(),
            asked: HashSet::new(),
            unusable: HashSet::new(),
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.controller.current()
    }

    #[must_use]
    pub fn plan(&self) -> &'p QuizPlan {
        self.plan
    }

    /// Next question at the current difficulty.
    ///
    /// Passages already asked are skipped until every eligible passage has been
    /// asked once; then the pool starts over. A passage that cannot be masked is
    /// dropped for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when no eligible passage can produce a question.
    pub fn next_question(&mut self) -> Result<Question, QuizError> {
        let plan = self.plan;
        let generator = QuestionGenerator::new(plan.index());
        let retriever = Retriever::new(plan.index(), plan.passages(), plan.bands());
        let difficulty = self.controller.current();

        loop {
            self.refill_pool()?;
            let hit = retriever.select_or_nearest(plan.query(), difficulty, &self.excluded())?;
            let passage = plan.passage(hit.passage).ok_or(QuizError::NoQuestions)?;

            match generator.generate(passage, difficulty) {
                Ok(question) => {
                    self.asked.insert(hit.passage);
                    debug!(
                        passage = %hit.passage,
                        %difficulty,
                        fallback = hit.fallback,
                        strategy = ?question.strategy,
                        "generated question"
                    );
                    return Ok(question);
                }
                Err(QuestionError::NothingToMask { passage }) => {
                    warn!(%passage, "passage has nothing to mask; skipping it");
                    self.unusable.insert(passage);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Score `submitted`, record it at the question's difficulty and step the controller.
    pub fn answer(
        &mut self,
        question: &Question,
        submitted: &str,
        stats: &mut SessionStats,
    ) -> AnswerOutcome {
        let score = self.scorer.score(submitted, &question.answer);
        stats.record(question.difficulty, score.is_correct);
        let transition = self.controller.record(score.is_correct);
        debug!(
            correct = score.is_correct,
            similarity = score.similarity,
            from = %transition.from,
            to = %transition.to,
            "scored answer"
        );
        AnswerOutcome { score, transition }
    }

    fn refill_pool(&mut self) -> Result<(), QuizError> {
        let mut usable = self
            .plan
            .eligible()
            .iter()
            .filter(|id| !self.unusable.contains(*id))
            .peekable();
        if usable.peek().is_none() {
            return Err(QuizError::NoQuestions);
        }
        if usable.all(|id| self.asked.contains(id)) {
            debug!(asked = self.asked.len(), "every passage asked; starting over");
            self.asked.clear();
        }
        Ok(())
    }

    fn excluded(&self) -> HashSet<PassageId> {
        self.plan
            .passages()
            .iter()
            .map(Passage::id)
            .filter(|id| {
                !self.plan.is_eligible(*id) || self.asked.contains(id) || self.unusable.contains(id)
            })
            .collect()
    }
}

impl fmt::Debug for QuizSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("difficulty", &self.controller.current())
            .field("threshold", &self.scorer.threshold())
            .field("asked_len", &self.asked.len())
            .field("unusable_len", &self.unusable.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
