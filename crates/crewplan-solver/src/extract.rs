//! Result extraction.
//!
//! Every KPI and penalty magnitude is recomputed from the assignment
//! itself rather than read from solver bookkeeping. The recomputed
//! weighted terms must match the solver's objective exactly on a proven
//! optimum, and may never exceed it; a violation of either is a fatal
//! consistency error.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crewplan_core::domain::{Instance, Role, Weights};
use crewplan_core::error::{Result, RosterError};

use crate::objective::PenaltyCategory;

/// Rest accounting for one crew member and one 7-day block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRest {
    pub week: u32,
    pub start_day: u32,
    pub end_day: u32,
    pub worked_days: u32,
    pub rest_days: u32,
    pub required_rest_days: u32,
    pub shortfall: u32,
}

/// Per-crew KPI values recomputed from the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewKpi {
    pub crew_id: String,
    pub role: Role,
    pub total_minutes: i64,
    pub worked_days: u32,
    pub weekly_rest: Vec<WeekRest>,
}

/// Outcome of one off-request against the final roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffRequestOutcome {
    pub crew_id: String,
    pub day: u32,
    pub penalty: i64,
    pub worked: bool,
    pub cost: i64,
}

/// One soft-constraint category of the objective breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PenaltyTerm {
    pub category: PenaltyCategory,
    pub weight: i64,
    /// Raw violation magnitude, reported even when the weight is zero.
    pub value: i64,
    pub contribution: i64,
}

/// Scalar objective and its per-category decomposition.
/// `objective_value` is the sum of the term contributions by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveBreakdown {
    pub objective_value: i64,
    pub terms: Vec<PenaltyTerm>,
}

impl ObjectiveBreakdown {
    pub fn total_from_terms(&self) -> i64 {
        self.terms.iter().map(|t| t.contribution).sum()
    }
}

/// A consistent roster extracted from a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterResult {
    pub objective_value: i64,
    /// crew id -> sorted assigned duty ids.
    pub assignments: BTreeMap<String, Vec<String>>,
    /// duty id -> sorted assigned crew ids.
    pub assigned_by_duty: BTreeMap<String, Vec<String>>,
    pub kpis: Vec<CrewKpi>,
    pub off_request_outcomes: Vec<OffRequestOutcome>,
    pub breakdown: ObjectiveBreakdown,
}

/// Builds a [`RosterResult`] from per-crew assigned duty indices.
///
/// `weights_in_objective` are the weights the model actually encoded
/// (the scenario weights for a full model, all-zero for a
/// feasibility-only model), so the consistency check compares like with
/// like. The reported objective is the recomputed one; on a proven
/// optimum it must equal `solver_objective` exactly. A non-optimal
/// incumbent may leave slack on the bounding auxiliaries, in which case
/// the solver value over-states the roster's true cost and is only
/// required to be an upper bound.
pub fn extract(
    instance: &Instance,
    crew_duties: &[Vec<usize>],
    solver_objective: i64,
    proven_optimal: bool,
    weights_in_objective: &Weights,
) -> Result<RosterResult> {
    debug_assert_eq!(crew_duties.len(), instance.crew.len());

    let worked: Vec<BTreeSet<u32>> = crew_duties
        .iter()
        .map(|duties| duties.iter().map(|&di| instance.duties[di].day).collect())
        .collect();

    let totals: Vec<i64> = crew_duties
        .iter()
        .map(|duties| {
            duties
                .iter()
                .map(|&di| instance.duties[di].duration_min())
                .sum()
        })
        .collect();

    let kpis: Vec<CrewKpi> = instance
        .crew
        .iter()
        .enumerate()
        .map(|(ci, c)| CrewKpi {
            crew_id: c.crew_id.clone(),
            role: c.role,
            total_minutes: totals[ci],
            worked_days: worked[ci].len() as u32,
            weekly_rest: weekly_rest_rows(instance, &worked[ci]),
        })
        .collect();

    let off_request_outcomes = off_request_outcomes(instance, &worked);

    let values = PenaltyValues {
        fairness_spread: fairness_spread(&totals),
        worked_days: worked.iter().map(|days| days.len() as i64).sum(),
        off_request: off_request_outcomes.iter().map(|o| o.cost).sum(),
        weekly_rest_shortfall: kpis
            .iter()
            .flat_map(|k| k.weekly_rest.iter())
            .map(|w| i64::from(w.shortfall))
            .sum(),
        late_to_early: late_to_early_count(instance, crew_duties),
    };

    let breakdown = values.breakdown(weights_in_objective);
    let total = breakdown.objective_value;
    if proven_optimal && total != solver_objective {
        return Err(RosterError::Inconsistent(format!(
            "recomputed penalty terms sum to {total}, solver proved an optimum of {solver_objective}"
        )));
    }
    if total > solver_objective {
        return Err(RosterError::Inconsistent(format!(
            "recomputed penalty terms sum to {total}, exceeding the solver objective {solver_objective}"
        )));
    }
    if total < solver_objective {
        tracing::debug!(
            recomputed = total,
            solver = solver_objective,
            "incumbent carries slack on penalty auxiliaries; reporting the recomputed objective"
        );
    }

    let mut assignments = BTreeMap::new();
    let mut assigned_by_duty: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (ci, duties) in crew_duties.iter().enumerate() {
        let crew_id = &instance.crew[ci].crew_id;
        let mut ids: Vec<String> = duties
            .iter()
            .map(|&di| instance.duties[di].duty_id.clone())
            .collect();
        ids.sort();
        assignments.insert(crew_id.clone(), ids);
        for &di in duties {
            assigned_by_duty
                .entry(instance.duties[di].duty_id.clone())
                .or_default()
                .push(crew_id.clone());
        }
    }
    for crew_ids in assigned_by_duty.values_mut() {
        crew_ids.sort();
    }

    Ok(RosterResult {
        objective_value: total,
        assignments,
        assigned_by_duty,
        kpis,
        off_request_outcomes,
        breakdown,
    })
}

/// Raw violation magnitudes per category.
struct PenaltyValues {
    fairness_spread: i64,
    worked_days: i64,
    off_request: i64,
    weekly_rest_shortfall: i64,
    late_to_early: i64,
}

impl PenaltyValues {
    fn value(&self, category: PenaltyCategory) -> i64 {
        match category {
            PenaltyCategory::FairnessSpread => self.fairness_spread,
            PenaltyCategory::WorkedDays => self.worked_days,
            PenaltyCategory::OffRequest => self.off_request,
            PenaltyCategory::WeeklyRestShortfall => self.weekly_rest_shortfall,
            PenaltyCategory::LateToEarly => self.late_to_early,
        }
    }

    fn breakdown(&self, weights: &Weights) -> ObjectiveBreakdown {
        let terms: Vec<PenaltyTerm> = PenaltyCategory::ALL
            .iter()
            .map(|&category| {
                let weight = category.weight(weights);
                let value = self.value(category);
                PenaltyTerm {
                    category,
                    weight,
                    value,
                    contribution: weight * value,
                }
            })
            .collect();
        let objective_value = terms.iter().map(|t| t.contribution).sum();
        ObjectiveBreakdown {
            objective_value,
            terms,
        }
    }
}

/// Gap between the most- and least-loaded crew member, 0 for no crew.
fn fairness_spread(totals: &[i64]) -> i64 {
    match (totals.iter().max(), totals.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    }
}

fn weekly_rest_rows(instance: &Instance, worked_days: &BTreeSet<u32>) -> Vec<WeekRest> {
    let scenario = &instance.scenario;
    let required = scenario.min_rest_days_per_week;
    (0..scenario.num_weeks())
        .map(|week| {
            let days = scenario.week_days(week);
            let (start_day, end_day) = (*days.start(), *days.end());
            let days_in_week = end_day - start_day + 1;
            let worked = worked_days.range(start_day..=end_day).count() as u32;
            let rest = days_in_week - worked;
            WeekRest {
                week: week + 1,
                start_day,
                end_day,
                worked_days: worked,
                rest_days: rest,
                required_rest_days: required,
                shortfall: required.saturating_sub(rest),
            }
        })
        .collect()
}

fn off_request_outcomes(instance: &Instance, worked: &[BTreeSet<u32>]) -> Vec<OffRequestOutcome> {
    let crew_index = instance.crew_index_by_id();
    let mut outcomes: Vec<OffRequestOutcome> = instance
        .off_requests
        .iter()
        .map(|r| {
            let worked_that_day = crew_index
                .get(r.crew_id.as_str())
                .is_some_and(|&ci| worked[ci].contains(&r.day));
            OffRequestOutcome {
                crew_id: r.crew_id.clone(),
                day: r.day,
                penalty: r.penalty,
                worked: worked_that_day,
                cost: if worked_that_day { r.penalty } else { 0 },
            }
        })
        .collect();
    outcomes.sort_by(|a, b| (&a.crew_id, a.day).cmp(&(&b.crew_id, b.day)));
    outcomes
}

/// Counts crew/day pairs where a duty ends at or after the late
/// threshold and a next-day duty starts at or before the early
/// threshold. The last horizon day has no successor and never counts.
fn late_to_early_count(instance: &Instance, crew_duties: &[Vec<usize>]) -> i64 {
    let scenario = &instance.scenario;
    let mut count = 0;
    for duties in crew_duties {
        for day in 1..scenario.horizon_days {
            let late = duties.iter().any(|&di| {
                let d = &instance.duties[di];
                d.day == day && d.end_min >= scenario.late_end_threshold_min
            });
            if !late {
                continue;
            }
            let early = duties.iter().any(|&di| {
                let d = &instance.duties[di];
                d.day == day + 1 && d.start_min <= scenario.early_start_threshold_min
            });
            if early {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests;
