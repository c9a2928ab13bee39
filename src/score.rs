//! Shared confidence scorer
//!
//! Several semantic heuristics decide "is this div really a heading/list/
//! article?" from independent signals. A single boolean check would over-
//! or under-fire, so each signal contributes a weight and the sum is
//! compared to a per-rule threshold. One scorer serves every rule so the
//! semantics stay consistent and testable in isolation.
//!
//! Scoring never fails: an ambiguous signal simply contributes its weight
//! or does not.

/// One contribution to a confidence score
#[derive(Debug, Clone, Copy)]
pub struct Signal {
    /// Whether the signal fired
    pub active: bool,
    /// Weight added when active
    pub weight: f64,
}

impl Signal {
    pub fn new(active: bool, weight: f64) -> Self {
        Self { active, weight }
    }
}

/// Accumulated confidence for one candidate node.
///
/// Additive signals go through `add`; rule-specific multiplicative
/// adjustments (an existing list halving a list candidate, weak evidence
/// damping an article candidate) go through `scale` and must be applied
/// after the additive pass, in the order the rule documents - threshold
/// comparison is sensitive to that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new() -> Self {
        Self(0.0)
    }

    /// Weighted sum of a signal list
    pub fn from_signals(signals: &[Signal]) -> Self {
        let mut score = Self::new();
        for signal in signals {
            score = score.add(*signal);
        }
        score
    }

    /// Add one signal's weight when it fired
    pub fn add(self, signal: Signal) -> Self {
        if signal.active {
            Self(self.0 + signal.weight)
        } else {
            self
        }
    }

    /// Multiply the accumulated score when the condition holds
    pub fn scale_if(self, condition: bool, factor: f64) -> Self {
        if condition {
            Self(self.0 * factor)
        } else {
            self
        }
    }

    /// Force the score to zero (hard exclusion)
    pub fn veto_if(self, condition: bool) -> Self {
        if condition {
            Self(0.0)
        } else {
            self
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Threshold comparison (inclusive)
    pub fn meets(self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}
