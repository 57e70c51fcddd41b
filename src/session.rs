//! Assessment session driver
//!
//! Composes the question, the telemetry tracker, and the risk scorer into
//! the lifecycle of one assessment attempt: collect interaction signals,
//! collect an answer, and assemble the submission payload exactly once.
//!
//! The submit guard mirrors the UI behavior: submission is disabled while a
//! request is in flight and permanently after success; a failed request
//! re-enables it. The guard is per-session state only; it does not
//! deduplicate requests beyond that.

use chrono::{DateTime, Utc};

use crate::error::VigilError;
use crate::question::Question;
use crate::scoring::{assess, RiskAssessment, RiskThresholds};
use crate::submission::NewSubmission;
use crate::telemetry::SessionTelemetry;

/// Where the session is in its submit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// Collecting signals and answer text; submission allowed.
    Collecting,
    /// A submission request is in flight; further submits rejected.
    Submitting,
    /// The submission succeeded; the session is finished.
    Submitted,
}

/// One assessment attempt, from page load to submission.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    question: Question,
    telemetry: SessionTelemetry,
    thresholds: RiskThresholds,
    answer: String,
    state: SubmitState,
}

impl AssessmentSession {
    /// Start a session on the default question with default thresholds.
    pub fn new() -> Self {
        Self::with_question(Question::default(), RiskThresholds::default())
    }

    pub fn with_question(question: Question, thresholds: RiskThresholds) -> Self {
        Self {
            question,
            telemetry: SessionTelemetry::new(),
            thresholds,
            answer: String::new(),
            state: SubmitState::Collecting,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn telemetry(&self) -> &SessionTelemetry {
        &self.telemetry
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Whether the submit control should currently be enabled.
    pub fn can_submit(&self) -> bool {
        self.state == SubmitState::Collecting && !self.answer.trim().is_empty()
    }

    // Signal forwarding. Hover indices outside the question's word range
    // still accumulate; they simply can never reach full reveal.

    pub fn mouse_moved(&mut self) {
        self.telemetry.record_mouse_move();
    }

    pub fn word_entered(&mut self, index: usize) {
        self.telemetry.hover_enter(index);
    }

    pub fn word_left(&mut self, index: usize) {
        self.telemetry.hover_leave(index);
    }

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.answer = answer.into();
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Score the session as it stands, without submitting.
    pub fn assess(&self, now: DateTime<Utc>) -> RiskAssessment {
        assess(
            &self.answer,
            self.telemetry.elapsed_seconds(now),
            self.telemetry.mouse_moves(),
            self.telemetry.ever_hovered_count(),
            self.question.total_words(),
            &self.thresholds,
        )
    }

    /// Assemble the submission payload and lock the submit guard.
    ///
    /// Rejects empty or whitespace-only answers before any payload is
    /// built, and rejects re-entry while a request is in flight or after
    /// success. Elapsed time and the score are computed here, once.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<NewSubmission, VigilError> {
        match self.state {
            SubmitState::Submitting => return Err(VigilError::SubmitInFlight),
            SubmitState::Submitted => return Err(VigilError::AlreadySubmitted),
            SubmitState::Collecting => {}
        }
        if self.answer.trim().is_empty() {
            return Err(VigilError::EmptyAnswer);
        }

        let elapsed = self.telemetry.elapsed_seconds(now);
        let assessment = self.assess(now);

        self.state = SubmitState::Submitting;
        Ok(NewSubmission {
            answer: self.answer.clone(),
            time_spent_seconds: elapsed as i64,
            mouse_moves: i64::from(self.telemetry.mouse_moves()),
            hover_count: self.telemetry.ever_hovered_count() as i64,
            risk_score: assessment.score,
        })
    }

    /// The in-flight request failed: re-enable submission. Telemetry keeps
    /// accumulating until the user retries.
    pub fn submit_failed(&mut self) {
        if self.state == SubmitState::Submitting {
            self.state = SubmitState::Collecting;
        }
    }

    /// The in-flight request succeeded: the session is finished.
    pub fn submit_succeeded(&mut self) {
        if self.state == SubmitState::Submitting {
            self.state = SubmitState::Submitted;
        }
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_reveal(session: &mut AssessmentSession) {
        for index in 0..session.question().total_words() {
            session.word_entered(index);
            session.word_left(index);
        }
    }

    #[test]
    fn test_empty_answer_rejected_before_payload_is_built() {
        let mut session = AssessmentSession::new();
        session.set_answer("   \n\t ");

        let err = session.begin_submit(Utc::now()).unwrap_err();
        assert!(matches!(err, VigilError::EmptyAnswer));
        // The guard never engaged: the session is still collecting.
        assert_eq!(session.state(), SubmitState::Collecting);
    }

    #[test]
    fn test_begin_submit_locks_the_guard() {
        let mut session = AssessmentSession::new();
        session.set_answer("O(log n)");

        let payload = session.begin_submit(Utc::now()).unwrap();
        assert_eq!(payload.answer, "O(log n)");
        assert_eq!(session.state(), SubmitState::Submitting);

        let err = session.begin_submit(Utc::now()).unwrap_err();
        assert!(matches!(err, VigilError::SubmitInFlight));
    }

    #[test]
    fn test_failure_reenables_submission() {
        let mut session = AssessmentSession::new();
        session.set_answer("first try");
        session.begin_submit(Utc::now()).unwrap();

        session.submit_failed();
        assert_eq!(session.state(), SubmitState::Collecting);
        assert!(session.begin_submit(Utc::now()).is_ok());
    }

    #[test]
    fn test_success_is_terminal() {
        let mut session = AssessmentSession::new();
        session.set_answer("done");
        session.begin_submit(Utc::now()).unwrap();
        session.submit_succeeded();

        let err = session.begin_submit(Utc::now()).unwrap_err();
        assert!(matches!(err, VigilError::AlreadySubmitted));
        // A late failure callback must not reopen a finished session.
        session.submit_failed();
        assert_eq!(session.state(), SubmitState::Submitted);
    }

    #[test]
    fn test_payload_reflects_accumulated_telemetry() {
        let mut session = AssessmentSession::new();
        for _ in 0..120 {
            session.mouse_moved();
        }
        full_reveal(&mut session);
        session.set_answer("halves the interval");

        let payload = session.begin_submit(Utc::now()).unwrap();
        assert_eq!(payload.mouse_moves, 120);
        assert_eq!(payload.hover_count, 9);
        // All heuristics clear: enough movement, full reveal, short answer.
        assert_eq!(payload.risk_score, 0.0);
    }

    #[test]
    fn test_partial_reveal_scores_into_payload() {
        let mut session = AssessmentSession::new();
        for _ in 0..120 {
            session.mouse_moved();
        }
        session.word_entered(0);
        session.set_answer("a guess");

        let payload = session.begin_submit(Utc::now()).unwrap();
        assert!((payload.risk_score - 0.3).abs() < 1e-9);
        assert_eq!(payload.hover_count, 1);
    }

    #[test]
    fn test_can_submit_tracks_answer_and_state() {
        let mut session = AssessmentSession::new();
        assert!(!session.can_submit());

        session.set_answer("something");
        assert!(session.can_submit());

        session.begin_submit(Utc::now()).unwrap();
        assert!(!session.can_submit());
    }
}
