// src/session.rs

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::models::question::{Question, QuestionKind};

/// How many questions of each kind a quiz attempt draws from the pool.
/// Partitions smaller than this contribute everything they have.
pub const SAMPLE_PER_KIND: usize = 5;

/// Stage of one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The current question is unanswered and may be submitted.
    InProgress,
    /// The current question is answered; feedback is shown and the
    /// caller must explicitly advance before anything else.
    AwaitingAdvance,
    /// All questions answered. Terminal.
    Completed,
}

/// One graded answer. Appended per question, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub points_awarded: u32,
}

/// Qualitative banding of the final score percentage. Exact wording is
/// left to the presentation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Excellent,
    Good,
    NeedsPractice,
}

impl FeedbackTier {
    /// Bands `total` out of `max_possible`: >= 80% excellent, >= 60%
    /// good, everything else needs practice. A zero-point quiz counts
    /// as 0%.
    pub fn for_score(total: u32, max_possible: u32) -> Self {
        let percentage = if max_possible == 0 {
            0.0
        } else {
            f64::from(total) / f64::from(max_possible) * 100.0
        };

        if percentage >= 80.0 {
            FeedbackTier::Excellent
        } else if percentage >= 60.0 {
            FeedbackTier::Good
        } else {
            FeedbackTier::NeedsPractice
        }
    }
}

/// Result view of a completed attempt.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub total_score: u32,
    pub max_possible_score: u32,
    pub feedback_tier: FeedbackTier,
    pub answers: Vec<AnswerRecord>,
}

/// Errors surfaced by the engine. Both are caller contract violations,
/// never crashes: the presentation layer recovers and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// An operation was invoked in a phase that forbids it.
    InvalidStateTransition {
        operation: &'static str,
        phase: Phase,
    },
    /// Sampling produced zero questions; the attempt must not start.
    EmptyQuestionSet,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidStateTransition { operation, phase } => {
                write!(f, "`{}` is not valid in phase {:?}", operation, phase)
            }
            SessionError::EmptyQuestionSet => {
                write!(f, "no questions available to start a quiz")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// State machine driving one quiz attempt.
///
/// Pure and synchronous: no I/O, no clock, no shared state. Every
/// mutation goes through `submit_answer` / `advance`, so a transition is
/// atomic and double-scoring is impossible by construction.
#[derive(Debug)]
pub struct QuizSession {
    quiz_set: Vec<Question>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    total_score: u32,
    phase: Phase,
    pending_selection: Option<String>,
}

impl QuizSession {
    /// Starts a fresh attempt over a QuizSet sampled from `pool`.
    ///
    /// The pool is partitioned by kind; up to [`SAMPLE_PER_KIND`] items
    /// are drawn from each partition without replacement, then the
    /// combined set is shuffled. The random source is injected so tests
    /// can seed it; production passes `rand::thread_rng()`.
    pub fn new<R: Rng + ?Sized>(pool: &[Question], rng: &mut R) -> Result<Self, SessionError> {
        let quiz_set = sample_quiz_set(pool, rng);
        if quiz_set.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }
        Ok(Self::over(quiz_set))
    }

    fn over(quiz_set: Vec<Question>) -> Self {
        Self {
            quiz_set,
            current_index: 0,
            answers: Vec::new(),
            total_score: 0,
            phase: Phase::InProgress,
            pending_selection: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 0-based position into the QuizSet.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.quiz_set.len()
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// The unsubmitted (or just-submitted, until `advance`) user input
    /// for the current question. Drives feedback rendering.
    pub fn pending_selection(&self) -> Option<&str> {
        self.pending_selection.as_deref()
    }

    /// The question at `current_index`. `None` once the attempt is
    /// completed.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::Completed => None,
            _ => self.quiz_set.get(self.current_index),
        }
    }

    /// Grades `selection` against the current question and moves to
    /// `AwaitingAdvance`. The phase guard is what prevents scoring the
    /// same question twice.
    ///
    /// Multiple-choice answers are compared exactly; a selection that is
    /// not one of the options simply grades as incorrect. Fill-in
    /// answers are compared case-insensitively with surrounding
    /// whitespace trimmed.
    pub fn submit_answer(&mut self, selection: &str) -> Result<&AnswerRecord, SessionError> {
        if self.phase != Phase::InProgress {
            return Err(SessionError::InvalidStateTransition {
                operation: "submit_answer",
                phase: self.phase,
            });
        }

        // The phase guard guarantees the index is in bounds here.
        let question = &self.quiz_set[self.current_index];
        let is_correct = grade(question, selection);
        let points_awarded = if is_correct { question.marks } else { 0 };

        self.total_score += points_awarded;
        self.answers.push(AnswerRecord {
            question_id: question.id,
            submitted_answer: selection.to_string(),
            is_correct,
            points_awarded,
        });
        self.pending_selection = Some(selection.to_string());
        self.phase = Phase::AwaitingAdvance;

        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Leaves the feedback stage: steps to the next question, or to
    /// `Completed` if the answered question was the last one. Returns
    /// the phase entered.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        if self.phase != Phase::AwaitingAdvance {
            return Err(SessionError::InvalidStateTransition {
                operation: "advance",
                phase: self.phase,
            });
        }

        self.pending_selection = None;
        if self.current_index + 1 >= self.quiz_set.len() {
            self.phase = Phase::Completed;
        } else {
            self.current_index += 1;
            self.phase = Phase::InProgress;
        }
        Ok(self.phase)
    }

    pub fn max_possible_score(&self) -> u32 {
        self.quiz_set.iter().map(|q| q.marks).sum()
    }

    /// Result view of the attempt. Only available once completed.
    pub fn summary(&self) -> Result<QuizSummary, SessionError> {
        if self.phase != Phase::Completed {
            return Err(SessionError::InvalidStateTransition {
                operation: "summary",
                phase: self.phase,
            });
        }

        let max_possible_score = self.max_possible_score();
        Ok(QuizSummary {
            total_score: self.total_score,
            max_possible_score,
            feedback_tier: FeedbackTier::for_score(self.total_score, max_possible_score),
            answers: self.answers.clone(),
        })
    }
}

fn grade(question: &Question, selection: &str) -> bool {
    match question.kind {
        QuestionKind::MultipleChoice => selection == question.answer,
        QuestionKind::FillInBlank => {
            selection.trim().to_lowercase() == question.answer.trim().to_lowercase()
        }
    }
}

/// Draws the QuizSet for one attempt: up to [`SAMPLE_PER_KIND`] of each
/// kind, merged and shuffled so the kinds interleave.
fn sample_quiz_set<R: Rng + ?Sized>(pool: &[Question], rng: &mut R) -> Vec<Question> {
    let (choice, blank): (Vec<&Question>, Vec<&Question>) = pool
        .iter()
        .partition(|q| q.kind == QuestionKind::MultipleChoice);

    let mut quiz_set: Vec<Question> = choice
        .choose_multiple(rng, SAMPLE_PER_KIND)
        .map(|q| (*q).clone())
        .collect();
    quiz_set.extend(
        blank
            .choose_multiple(rng, SAMPLE_PER_KIND)
            .map(|q| (*q).clone()),
    );
    quiz_set.shuffle(rng);
    quiz_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn choice(id: i64, answer: &str, marks: u32) -> Question {
        Question {
            id,
            kind: QuestionKind::MultipleChoice,
            prompt: format!("Question {}", id),
            options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            answer: answer.to_string(),
            marks,
        }
    }

    fn blank(id: i64, answer: &str, marks: u32) -> Question {
        Question {
            id,
            kind: QuestionKind::FillInBlank,
            prompt: format!("Fill in ____ ({})", id),
            options: Vec::new(),
            answer: answer.to_string(),
            marks,
        }
    }

    fn session_over(quiz_set: Vec<Question>) -> QuizSession {
        QuizSession::over(quiz_set)
    }

    #[test]
    fn test_sampling_draws_five_per_kind() {
        let mut pool = Vec::new();
        for i in 0..8 {
            pool.push(choice(i, "A", 10));
        }
        for i in 8..16 {
            pool.push(blank(i, "answer", 5));
        }

        let mut rng = StdRng::seed_from_u64(42);
        let session = QuizSession::new(&pool, &mut rng).unwrap();

        assert_eq!(session.total_questions(), 10);
        let choices = session
            .quiz_set
            .iter()
            .filter(|q| q.kind == QuestionKind::MultipleChoice)
            .count();
        assert_eq!(choices, 5);
        assert_eq!(session.total_questions() - choices, 5);
    }

    #[test]
    fn test_sampling_is_reproducible_with_same_seed() {
        let pool: Vec<Question> = (0..12).map(|i| choice(i, "A", 10)).collect();

        let ids = |seed: u64| -> Vec<i64> {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = QuizSession::new(&pool, &mut rng).unwrap();
            session.quiz_set.iter().map(|q| q.id).collect()
        };

        assert_eq!(ids(7), ids(7));
    }

    #[test]
    fn test_sampling_short_partitions_draw_what_exists() {
        // Fewer than 5 of each kind: no out-of-range failure, the
        // available maximum is drawn.
        let pool = vec![choice(1, "A", 10), choice(2, "B", 10), blank(3, "x", 5)];

        let mut rng = StdRng::seed_from_u64(1);
        let session = QuizSession::new(&pool, &mut rng).unwrap();
        assert_eq!(session.total_questions(), 3);
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = QuizSession::new(&[], &mut rng);
        assert_eq!(result.err(), Some(SessionError::EmptyQuestionSet));
    }

    #[test]
    fn test_advance_walks_every_question_exactly_once() {
        let quiz_set: Vec<Question> = (0..6).map(|i| choice(i, "A", 10)).collect();
        let mut session = session_over(quiz_set);

        for expected_index in 0..6 {
            assert_eq!(session.phase(), Phase::InProgress);
            assert_eq!(session.current_index(), expected_index);
            session.submit_answer("A").unwrap();
            assert_eq!(session.phase(), Phase::AwaitingAdvance);
            session.advance().unwrap();
        }

        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.answers().len(), 6);
    }

    #[test]
    fn test_total_score_is_sum_of_awarded_points() {
        let quiz_set = vec![
            choice(1, "A", 10),
            choice(2, "B", 20),
            blank(3, "paris", 5),
        ];
        let mut session = session_over(quiz_set);

        session.submit_answer("A").unwrap(); // correct, +10
        session.advance().unwrap();
        session.submit_answer("C").unwrap(); // wrong, +0
        session.advance().unwrap();
        session.submit_answer("Paris").unwrap(); // correct, +5
        session.advance().unwrap();

        let summary = session.summary().unwrap();
        let awarded: u32 = summary.answers.iter().map(|a| a.points_awarded).sum();
        assert_eq!(summary.total_score, 15);
        assert_eq!(summary.total_score, awarded);
        assert_eq!(summary.max_possible_score, 35);
    }

    #[test]
    fn test_fill_in_matching_ignores_case_and_whitespace() {
        let mut session = session_over(vec![blank(1, "paris", 5)]);

        let record = session.submit_answer(" Paris ").unwrap();
        assert!(record.is_correct);
        assert_eq!(record.points_awarded, 5);
    }

    #[test]
    fn test_multiple_choice_matching_is_exact() {
        let mut session = session_over(vec![choice(1, "B", 10)]);

        // Case differs from the stored option: graded incorrect.
        let record = session.submit_answer("b").unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.points_awarded, 0);
        assert_eq!(session.total_score(), 0);
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let mut session = session_over(vec![choice(1, "A", 10), choice(2, "A", 10)]);

        session.submit_answer("A").unwrap();
        let second = session.submit_answer("A");
        assert_eq!(
            second.err(),
            Some(SessionError::InvalidStateTransition {
                operation: "submit_answer",
                phase: Phase::AwaitingAdvance,
            })
        );
        // The guard kept the score from doubling.
        assert_eq!(session.total_score(), 10);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn test_advance_requires_a_submitted_answer() {
        let mut session = session_over(vec![choice(1, "A", 10)]);

        let result = session.advance();
        assert_eq!(
            result.err(),
            Some(SessionError::InvalidStateTransition {
                operation: "advance",
                phase: Phase::InProgress,
            })
        );
    }

    #[test]
    fn test_submit_after_completion_is_rejected() {
        let mut session = session_over(vec![choice(1, "A", 10)]);
        session.submit_answer("A").unwrap();
        session.advance().unwrap();

        assert_eq!(session.phase(), Phase::Completed);
        assert!(session.current_question().is_none());
        assert_eq!(
            session.submit_answer("A").err(),
            Some(SessionError::InvalidStateTransition {
                operation: "submit_answer",
                phase: Phase::Completed,
            })
        );
    }

    #[test]
    fn test_summary_requires_completion() {
        let session = session_over(vec![choice(1, "A", 10)]);
        assert!(session.summary().is_err());
    }

    #[test]
    fn test_pending_selection_lifecycle() {
        let mut session = session_over(vec![choice(1, "B", 10), choice(2, "B", 10)]);

        assert_eq!(session.pending_selection(), None);
        session.submit_answer("C").unwrap();
        assert_eq!(session.pending_selection(), Some("C"));
        session.advance().unwrap();
        assert_eq!(session.pending_selection(), None);
    }

    #[test]
    fn test_full_attempt_scenario() {
        let quiz_set = vec![choice(1, "B", 10), blank(2, "Paris", 5)];
        let mut session = session_over(quiz_set);

        let record = session.submit_answer("B").unwrap();
        assert!(record.is_correct);
        assert_eq!(session.total_score(), 10);
        assert_eq!(session.phase(), Phase::AwaitingAdvance);

        assert_eq!(session.advance().unwrap(), Phase::InProgress);
        assert_eq!(session.current_index(), 1);

        let record = session.submit_answer("paris").unwrap();
        assert!(record.is_correct);
        assert_eq!(session.total_score(), 15);

        assert_eq!(session.advance().unwrap(), Phase::Completed);

        let summary = session.summary().unwrap();
        assert_eq!(summary.total_score, 15);
        assert_eq!(summary.max_possible_score, 15);
        assert_eq!(summary.feedback_tier, FeedbackTier::Excellent);
    }

    #[test]
    fn test_feedback_tier_banding() {
        assert_eq!(FeedbackTier::for_score(80, 100), FeedbackTier::Excellent);
        assert_eq!(FeedbackTier::for_score(79, 100), FeedbackTier::Good);
        assert_eq!(FeedbackTier::for_score(60, 100), FeedbackTier::Good);
        assert_eq!(
            FeedbackTier::for_score(59, 100),
            FeedbackTier::NeedsPractice
        );
        // A quiz worth zero points cannot be scored above 0%.
        assert_eq!(FeedbackTier::for_score(0, 0), FeedbackTier::NeedsPractice);
    }
}
