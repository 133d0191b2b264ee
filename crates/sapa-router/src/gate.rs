// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence gate and escalation tracker.
//!
//! The gate is a pure function over the current classification confidence and
//! the caller's recent turn confidences. Escalation state is never stored: it
//! is recomputed each turn from the conversation log, so the log stays the
//! single source of truth and clearing history resets the streak for free.

use sapa_config::RouterConfig;

/// Thresholds governing one gate decision.
#[derive(Debug, Clone, Copy)]
pub struct GatePolicy {
    /// Classifications at or above this confidence are trusted.
    pub confidence_threshold: f64,
    /// How many of the caller's most recent turns are examined.
    pub window: usize,
    /// Low-confidence turns within the window needed to escalate.
    pub trigger: usize,
}

impl GatePolicy {
    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            window: config.escalation_window,
            trigger: config.escalation_trigger,
        }
    }

    /// Decide how to handle a turn.
    ///
    /// `recent` holds the confidences of the caller's previous turns, newest
    /// first, read from the log BEFORE the current turn is appended. Turns
    /// that do not exist yet (a new user) simply contribute nothing, so a
    /// short history can never escalate.
    pub fn decide(&self, confidence: f64, recent: &[f64]) -> GateDecision {
        if confidence >= self.confidence_threshold {
            return GateDecision::Dispatch;
        }
        let low = recent
            .iter()
            .take(self.window)
            .filter(|c| **c < self.confidence_threshold)
            .count();
        if low >= self.trigger {
            GateDecision::Escalate
        } else {
            GateDecision::Fallback
        }
    }
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}

/// Outcome of the confidence gate for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Confidence is trusted: route to the dispatch table.
    Dispatch,
    /// Not trusted, streak not yet reached: generic fallback reply.
    Fallback,
    /// Not trusted and the caller keeps missing: offer a human contact.
    Escalate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> GatePolicy {
        GatePolicy::default()
    }

    #[test]
    fn trusted_confidence_dispatches_regardless_of_history() {
        let recent = [0.1, 0.2, 0.1, 0.3];
        assert_eq!(policy().decide(0.6, &recent), GateDecision::Dispatch);
        assert_eq!(policy().decide(0.95, &recent), GateDecision::Dispatch);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(policy().decide(0.6, &[]), GateDecision::Dispatch);
        assert_eq!(policy().decide(0.5999, &[]), GateDecision::Fallback);
    }

    #[test]
    fn new_user_with_no_history_falls_back() {
        assert_eq!(policy().decide(0.1, &[]), GateDecision::Fallback);
    }

    #[test]
    fn escalates_at_exactly_trigger_low_turns_in_window() {
        // Two prior misses: not enough.
        assert_eq!(
            policy().decide(0.1, &[0.2, 0.3]),
            GateDecision::Fallback
        );
        // Three prior misses: escalate.
        assert_eq!(
            policy().decide(0.1, &[0.2, 0.3, 0.1]),
            GateDecision::Escalate
        );
    }

    #[test]
    fn window_is_sliding_not_cumulative() {
        // Many historic misses, but the last four turns include two
        // trusted ones: the streak is broken.
        let recent = [0.9, 0.8, 0.2, 0.1, 0.1, 0.1, 0.1];
        assert_eq!(policy().decide(0.1, &recent), GateDecision::Fallback);
    }

    #[test]
    fn one_trusted_turn_inside_window_still_escalates() {
        // 3 of the last 4 are low; one trusted turn does not save it.
        let recent = [0.2, 0.9, 0.3, 0.1];
        assert_eq!(policy().decide(0.1, &recent), GateDecision::Escalate);
    }

    #[test]
    fn turns_older_than_the_window_are_ignored() {
        // Only the newest four count: [0.9, 0.9, 0.9, 0.2].
        let recent = [0.9, 0.9, 0.9, 0.2, 0.1, 0.1, 0.1];
        assert_eq!(policy().decide(0.1, &recent), GateDecision::Fallback);
    }
}
