//! Domain types for a rostering instance
//!
//! All entities are read once at model-build time and never mutated.
//! Times are minutes; days are 1-based indices into the horizon.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Days in one rostering week. Week boundaries are fixed contiguous
/// 7-day blocks starting at day 1; the last block may be shorter.
pub const WEEK_LEN: u32 = 7;

/// Crew role, also the unit of duty coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CAPT")]
    Capt,
    #[serde(rename = "FO")]
    Fo,
    #[serde(rename = "FA")]
    Fa,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Capt => "CAPT",
            Role::Fo => "FO",
            Role::Fa => "FA",
        };
        f.write_str(s)
    }
}

/// A crew member available over the planning horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub crew_id: String,
    pub role: Role,
    /// Home base, e.g. "CDG".
    pub base: String,
    /// Aircraft types this crew member may operate, e.g. ["A320"].
    pub qualified_types: Vec<String>,
    /// Hard cap on total assigned duty minutes over the horizon.
    pub max_minutes: i64,
}

/// A single flight-crew work assignment with fixed start/end time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duty {
    pub duty_id: String,
    /// Day index, 1..=horizon_days.
    pub day: u32,
    /// Minutes since midnight of `day`; `end_min > start_min`, same day.
    pub start_min: i64,
    pub end_min: i64,
    pub base: String,
    pub aircraft_type: String,
    /// Required crew count per role for the duty to be legally staffed.
    pub coverage: BTreeMap<Role, u32>,
}

impl Duty {
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Start in minutes since the start of the horizon. Conflict checks
    /// compare absolute minutes so that rest gaps across midnight are
    /// measured correctly.
    pub fn abs_start_min(&self) -> i64 {
        i64::from(self.day - 1) * MINUTES_PER_DAY + self.start_min
    }

    /// End in minutes since the start of the horizon.
    pub fn abs_end_min(&self) -> i64 {
        i64::from(self.day - 1) * MINUTES_PER_DAY + self.end_min
    }
}

/// Objective weights per penalty category. Missing keys default to 0,
/// i.e. the category is not penalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub fairness_spread: i64,
    pub worked_days: i64,
    pub off_request: i64,
    pub weekly_rest_shortfall: i64,
    pub late_to_early: i64,
}

/// Scenario rules governing one rostering run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub horizon_days: u32,
    /// Minimum rest between two duties of the same crew member; a
    /// smaller gap makes the duty pair conflicting.
    pub min_rest_minutes: i64,
    /// Hard cap on working days in any sliding window of that many
    /// consecutive days plus one.
    pub max_consecutive_work_days: u32,
    /// Soft target for rest days per 7-day week.
    #[serde(default)]
    pub min_rest_days_per_week: u32,
    /// A duty ending at or after this minute-of-day counts as late.
    #[serde(default = "default_late_end_threshold")]
    pub late_end_threshold_min: i64,
    /// A duty starting at or before this minute-of-day counts as early.
    #[serde(default = "default_early_start_threshold")]
    pub early_start_threshold_min: i64,
    #[serde(default)]
    pub weights: Weights,
}

fn default_late_end_threshold() -> i64 {
    1200
}

fn default_early_start_threshold() -> i64 {
    480
}

impl Scenario {
    /// Number of 7-day weeks covering the horizon (last may be partial).
    pub fn num_weeks(&self) -> u32 {
        self.horizon_days.div_ceil(WEEK_LEN)
    }

    /// Inclusive day range of week `w` (0-based), clipped to the horizon.
    pub fn week_days(&self, week: u32) -> std::ops::RangeInclusive<u32> {
        let start = week * WEEK_LEN + 1;
        let end = ((week + 1) * WEEK_LEN).min(self.horizon_days);
        start..=end
    }
}

/// A crew preference to not work on a specific day, penalized in the
/// objective when violated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffRequest {
    pub crew_id: String,
    pub day: u32,
    /// Cost incurred if the crew member works that day; scaled by the
    /// global `off_request` weight.
    pub penalty: i64,
}

/// A complete, immutable rostering instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub scenario: Scenario,
    pub crew: Vec<CrewMember>,
    pub duties: Vec<Duty>,
    #[serde(default)]
    pub off_requests: Vec<OffRequest>,
}

impl Instance {
    /// Index of every crew member keyed by id.
    pub fn crew_index_by_id(&self) -> HashMap<&str, usize> {
        self.crew
            .iter()
            .enumerate()
            .map(|(i, c)| (c.crew_id.as_str(), i))
            .collect()
    }

    /// Index of every duty keyed by id.
    pub fn duty_index_by_id(&self) -> HashMap<&str, usize> {
        self.duties
            .iter()
            .enumerate()
            .map(|(i, d)| (d.duty_id.as_str(), i))
            .collect()
    }
}

#[cfg(test)]
mod tests;
