//! Crewplan Solver - decision model and solve orchestration
//!
//! Translates a validated rostering instance into a mixed-integer
//! program over SCIP:
//! - boolean assignment variables for eligible (crew, duty) pairs
//! - hard constraints: coverage, conflict exclusion, workload caps,
//!   sliding-window consecutive-day caps
//! - penalty encodings: fairness spread, worked days, off-request
//!   violations, weekly rest shortfall, late-to-early sequences
//! - one scalarized, minimized objective
//!
//! One solve call per run; the result extractor recomputes every KPI
//! from the assignment itself and cross-checks the solver's objective.

pub mod extract;
pub mod model;
pub mod objective;
pub mod solve;

pub use extract::{
    CrewKpi, ObjectiveBreakdown, OffRequestOutcome, PenaltyTerm, RosterResult, WeekRest,
};
pub use model::{ModelKind, ModelStats, RosterModel};
pub use objective::PenaltyCategory;
pub use solve::{
    solve, solve_instance, solve_instance_with_kind, SolveOptions, SolveOutcome, SolveStatus,
};
