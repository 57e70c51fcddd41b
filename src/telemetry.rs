//! Session telemetry tracker
//!
//! Accumulates the three raw interaction signals for one assessment session:
//! elapsed time, global mouse-move count, and the set of hovered word indices.
//! All mutations are in-memory and synchronous with their triggering UI event;
//! there is exactly one logical writer so no locking is involved.
//!
//! Hover state is tracked as two distinct sets. The *ever-hovered* set grows
//! only and is the scored signal; the *visible* set mirrors transient reveal
//! state and shrinks on hover-leave. Keeping them separate decouples the
//! scoring signal from rendering state.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Raw interaction signals accumulated over one assessment session.
#[derive(Debug, Clone)]
pub struct SessionTelemetry {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    mouse_moves: u32,
    ever_hovered: BTreeSet<usize>,
    visible: BTreeSet<usize>,
}

impl SessionTelemetry {
    /// Start a new session, stamping the start instant now.
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    /// Start a session at an explicit instant (tests, replay).
    pub fn started_at(start: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: start,
            mouse_moves: 0,
            ever_hovered: BTreeSet::new(),
            visible: BTreeSet::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Record one pointer movement. Called on every move event while the
    /// session is live; no upper bound, no debouncing.
    pub fn record_mouse_move(&mut self) {
        self.mouse_moves = self.mouse_moves.saturating_add(1);
    }

    /// Pointer entered a word token: the index joins both the ever-hovered
    /// set (idempotent) and the visible set.
    pub fn hover_enter(&mut self, index: usize) {
        self.ever_hovered.insert(index);
        self.visible.insert(index);
    }

    /// Pointer left a word token: only the visible set shrinks. The
    /// ever-hovered set is one-way.
    pub fn hover_leave(&mut self, index: usize) {
        self.visible.remove(&index);
    }

    pub fn mouse_moves(&self) -> u32 {
        self.mouse_moves
    }

    /// Number of distinct words hovered at least once.
    pub fn ever_hovered_count(&self) -> usize {
        self.ever_hovered.len()
    }

    pub fn ever_hovered(&self) -> &BTreeSet<usize> {
        &self.ever_hovered
    }

    /// Whether a word is currently revealed.
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.contains(&index)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Whole seconds elapsed from session start to `now`, floored.
    /// Computed once at submission time, not continuously.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        let millis = (now - self.started_at).num_milliseconds();
        if millis <= 0 {
            0
        } else {
            (millis / 1000) as u64
        }
    }
}

impl Default for SessionTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_mouse_moves_accumulate() {
        let mut telemetry = SessionTelemetry::new();
        for _ in 0..250 {
            telemetry.record_mouse_move();
        }
        assert_eq!(telemetry.mouse_moves(), 250);
    }

    #[test]
    fn test_hover_enter_is_idempotent() {
        let mut telemetry = SessionTelemetry::new();
        telemetry.hover_enter(3);
        telemetry.hover_enter(3);
        telemetry.hover_enter(3);
        assert_eq!(telemetry.ever_hovered_count(), 1);
        assert_eq!(telemetry.visible_count(), 1);
    }

    #[test]
    fn test_hover_leave_only_affects_visibility() {
        let mut telemetry = SessionTelemetry::new();
        telemetry.hover_enter(0);
        telemetry.hover_enter(1);
        telemetry.hover_leave(0);

        assert!(!telemetry.is_visible(0));
        assert!(telemetry.is_visible(1));
        assert_eq!(telemetry.ever_hovered_count(), 2);
    }

    #[test]
    fn test_ever_hovered_monotonic_across_enter_leave_sequences() {
        let mut telemetry = SessionTelemetry::new();
        let mut last = 0;

        // Arbitrary enter/leave churn over the same indices must never shrink
        // the ever-hovered set.
        for round in 0..5 {
            for index in 0..4 {
                telemetry.hover_enter(index);
                if (round + index) % 2 == 0 {
                    telemetry.hover_leave(index);
                }
                assert!(telemetry.ever_hovered_count() >= last);
                last = telemetry.ever_hovered_count();
            }
        }
        assert_eq!(telemetry.ever_hovered_count(), 4);
    }

    #[test]
    fn test_leave_without_enter_is_a_no_op() {
        let mut telemetry = SessionTelemetry::new();
        telemetry.hover_leave(7);
        assert_eq!(telemetry.ever_hovered_count(), 0);
        assert_eq!(telemetry.visible_count(), 0);
    }

    #[test]
    fn test_elapsed_seconds_floors() {
        let telemetry = SessionTelemetry::started_at(start());
        let now = start() + chrono::Duration::milliseconds(29_900);
        assert_eq!(telemetry.elapsed_seconds(now), 29);
    }

    #[test]
    fn test_elapsed_seconds_clamps_clock_skew_to_zero() {
        let telemetry = SessionTelemetry::started_at(start());
        let before = start() - chrono::Duration::seconds(5);
        assert_eq!(telemetry.elapsed_seconds(before), 0);
    }
}
