//! Penalty categories and their scalarization.
//!
//! The same weight table drives both sides of the objective: the model
//! builder reads it to place coefficients on auxiliary variables, and
//! the extractor reads it to recompute the weighted breakdown. Keeping
//! one source of truth is what makes the sum-to-total invariant hold.

use serde::Serialize;

use crewplan_core::domain::Weights;

/// A soft-constraint category appearing in the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyCategory {
    FairnessSpread,
    WorkedDays,
    OffRequest,
    WeeklyRestShortfall,
    LateToEarly,
}

impl PenaltyCategory {
    pub const ALL: [PenaltyCategory; 5] = [
        PenaltyCategory::FairnessSpread,
        PenaltyCategory::WorkedDays,
        PenaltyCategory::OffRequest,
        PenaltyCategory::WeeklyRestShortfall,
        PenaltyCategory::LateToEarly,
    ];

    /// Stable key used in reports, matching the scenario weights table.
    pub fn key(&self) -> &'static str {
        match self {
            PenaltyCategory::FairnessSpread => "fairness_spread",
            PenaltyCategory::WorkedDays => "worked_days",
            PenaltyCategory::OffRequest => "off_request",
            PenaltyCategory::WeeklyRestShortfall => "weekly_rest_shortfall",
            PenaltyCategory::LateToEarly => "late_to_early",
        }
    }

    /// The configured weight of this category.
    pub fn weight(&self, weights: &Weights) -> i64 {
        match self {
            PenaltyCategory::FairnessSpread => weights.fairness_spread,
            PenaltyCategory::WorkedDays => weights.worked_days,
            PenaltyCategory::OffRequest => weights.off_request,
            PenaltyCategory::WeeklyRestShortfall => weights.weekly_rest_shortfall,
            PenaltyCategory::LateToEarly => weights.late_to_early,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_lookup_matches_fields() {
        let w = Weights {
            fairness_spread: 1,
            worked_days: 2,
            off_request: 3,
            weekly_rest_shortfall: 4,
            late_to_early: 5,
        };
        let got: Vec<i64> = PenaltyCategory::ALL.iter().map(|c| c.weight(&w)).collect();
        assert_eq!(got, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_keys_are_the_wire_names() {
        assert_eq!(PenaltyCategory::FairnessSpread.key(), "fairness_spread");
        assert_eq!(PenaltyCategory::LateToEarly.key(), "late_to_early");
    }
}
