//! Solve orchestration.
//!
//! Exactly one solve call per run, bounded by a wall-clock budget. The
//! backend's terminal state maps onto four statuses; infeasibility and
//! budget exhaustion are reportable outcomes, not errors, and nothing is
//! ever retried with a larger budget.

use std::fmt;
use std::time::{Duration, Instant};

use russcip::Status;
use serde::Serialize;

use crewplan_core::conflicts::conflict_pairs;
use crewplan_core::domain::{Instance, Weights};
use crewplan_core::eligibility::Eligibility;
use crewplan_core::error::{Result, RosterError};
use crewplan_core::validate::validate_instance;

use crate::extract::{extract, RosterResult};
use crate::model::{ModelKind, RosterModel};

/// Solve configuration. The time limit is the only knob the caller
/// controls; the backend's internal search is a black box.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub time_limit: Duration,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            time_limit: Duration::from_secs(10),
        }
    }
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}

/// Terminal solve status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// A global optimum was found and proven.
    Optimal,
    /// A solution was found but optimality was not proven before the
    /// budget expired.
    Feasible,
    /// No assignment satisfies the hard constraints.
    Infeasible,
    /// The budget expired before any solution was found.
    Unknown,
}

impl SolveStatus {
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Status plus, when a solution exists, the extracted roster.
#[derive(Debug, Clone, Serialize)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub result: Option<RosterResult>,
}

/// Runs the solver on a built model.
pub fn solve(instance: &Instance, model: RosterModel, options: &SolveOptions) -> Result<SolveOutcome> {
    let RosterModel { scip, x, kind, .. } = model;

    let seconds = options.time_limit.as_secs_f64().ceil().max(1.0) as usize;
    let scip = scip.set_time_limit(seconds);

    let start = Instant::now();
    let solved = scip.solve();
    let elapsed = start.elapsed();

    let status = match solved.status() {
        Status::Optimal => SolveStatus::Optimal,
        Status::Infeasible => SolveStatus::Infeasible,
        _ if solved.best_sol().is_some() => SolveStatus::Feasible,
        _ => SolveStatus::Unknown,
    };
    tracing::info!(%status, ?elapsed, "solve finished");

    if !status.has_solution() {
        return Ok(SolveOutcome {
            status,
            result: None,
        });
    }

    let sol = solved.best_sol().ok_or_else(|| {
        RosterError::Solver("backend reported a solution but returned none".into())
    })?;

    let mut crew_duties: Vec<Vec<usize>> = vec![Vec::new(); instance.crew.len()];
    for ((ci, di), var) in &x {
        if sol.val(var) > 0.5 {
            crew_duties[*ci].push(*di);
        }
    }
    for duties in &mut crew_duties {
        duties.sort_unstable();
    }

    let solver_objective = solved.obj_val().round() as i64;
    let encoded_weights = match kind {
        ModelKind::Full => instance.scenario.weights,
        ModelKind::FeasibilityOnly => Weights::default(),
    };
    let result = extract(
        instance,
        &crew_duties,
        solver_objective,
        status == SolveStatus::Optimal,
        &encoded_weights,
    )?;

    Ok(SolveOutcome {
        status,
        result: Some(result),
    })
}

/// Validates, preprocesses, builds and solves an instance end to end.
pub fn solve_instance(instance: &Instance, options: &SolveOptions) -> Result<SolveOutcome> {
    solve_instance_with_kind(instance, options, ModelKind::Full)
}

/// As [`solve_instance`], with an explicit [`ModelKind`].
pub fn solve_instance_with_kind(
    instance: &Instance,
    options: &SolveOptions,
    kind: ModelKind,
) -> Result<SolveOutcome> {
    validate_instance(instance)?;
    let eligibility = Eligibility::compute(instance);
    let conflicts = conflict_pairs(&instance.duties, instance.scenario.min_rest_minutes);
    tracing::debug!(
        crew = instance.crew.len(),
        duties = instance.duties.len(),
        eligible_pairs = eligibility.len(),
        conflict_pairs = conflicts.len(),
        "preprocessing finished"
    );
    let model = RosterModel::build_with_kind(instance, &eligibility, &conflicts, kind)?;
    solve(instance, model, options)
}
