//! Heuristic risk scoring
//!
//! Maps the accumulated session signals plus the answer text to a bounded
//! score in [0, 1]. The heuristics are additive and order-independent; the
//! final score is the sum of triggered weights, capped at 1.0. Fully
//! deterministic given its inputs, with no randomness or external state.

use serde::{Deserialize, Serialize};

use crate::error::VigilError;

/// Tunable thresholds and weights for the risk heuristics.
///
/// The defaults carry the shipped calibration (100 moves, full-word
/// reveal, 150 chars in under 30 seconds) but nothing in the scorer depends
/// on these exact values; swap them when reusing the scorer for a different
/// question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Mouse-move counts below this trigger the low-activity heuristic.
    pub min_mouse_moves: u32,
    /// Answer lengths (in characters) above this are "long".
    pub long_answer_chars: usize,
    /// Elapsed times below this many seconds are "fast".
    pub fast_answer_secs: u64,
    /// Weight added when mouse activity is low.
    pub low_activity_weight: f64,
    /// Weight added when not every word was revealed.
    pub partial_reveal_weight: f64,
    /// Weight added when a long answer arrived implausibly fast.
    pub rushed_answer_weight: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            min_mouse_moves: 100,
            long_answer_chars: 150,
            fast_answer_secs: 30,
            low_activity_weight: 0.4,
            partial_reveal_weight: 0.3,
            rushed_answer_weight: 0.4,
        }
    }
}

impl RiskThresholds {
    /// Reject weights outside [0, 1]; a single heuristic must not exceed
    /// the score cap on its own.
    pub fn validate(&self) -> Result<(), VigilError> {
        for (name, weight) in [
            ("low_activity_weight", self.low_activity_weight),
            ("partial_reveal_weight", self.partial_reveal_weight),
            ("rushed_answer_weight", self.rushed_answer_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(VigilError::validation(
                    name,
                    format!("weight {} outside [0, 1]", weight),
                ));
            }
        }
        Ok(())
    }
}

/// Which heuristic fired for a scored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    /// Fewer pointer movements than a human session normally produces.
    LowMouseActivity,
    /// The user never revealed every word of the question.
    PartialReveal,
    /// A long answer was typed implausibly fast.
    RushedLongAnswer,
}

/// Score plus the heuristics that contributed to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of triggered weights, capped at 1.0.
    pub score: f64,
    /// Heuristics that fired, in evaluation order.
    pub flags: Vec<RiskFlag>,
}

impl RiskAssessment {
    /// Presentation threshold above which a submission is surfaced as flagged.
    pub fn is_high_risk(&self) -> bool {
        self.score > 0.5
    }
}

/// Evaluate all heuristics and return the capped score with its breakdown.
pub fn assess(
    answer: &str,
    elapsed_seconds: u64,
    mouse_moves: u32,
    ever_hovered_count: usize,
    total_words: usize,
    thresholds: &RiskThresholds,
) -> RiskAssessment {
    let mut score = 0.0;
    let mut flags = Vec::new();

    if mouse_moves < thresholds.min_mouse_moves {
        score += thresholds.low_activity_weight;
        flags.push(RiskFlag::LowMouseActivity);
    }

    if ever_hovered_count < total_words {
        score += thresholds.partial_reveal_weight;
        flags.push(RiskFlag::PartialReveal);
    }

    let answer_chars = answer.chars().count();
    if answer_chars > thresholds.long_answer_chars && elapsed_seconds < thresholds.fast_answer_secs
    {
        score += thresholds.rushed_answer_weight;
        flags.push(RiskFlag::RushedLongAnswer);
    }

    RiskAssessment {
        score: score.min(1.0),
        flags,
    }
}

/// Convenience wrapper returning only the score, with default thresholds.
pub fn score(
    answer: &str,
    elapsed_seconds: u64,
    mouse_moves: u32,
    ever_hovered_count: usize,
    total_words: usize,
) -> f64 {
    assess(
        answer,
        elapsed_seconds,
        mouse_moves,
        ever_hovered_count,
        total_words,
        &RiskThresholds::default(),
    )
    .score
}
