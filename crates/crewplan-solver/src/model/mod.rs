//! Decision model build.
//!
//! A [`RosterModel`] is a SCIP problem plus the registry of assignment
//! variables needed to read a solution back. Variables exist only for
//! eligible (crew, duty) pairs; everything else is derived from them by
//! two-direction linkage constraints so that no auxiliary variable can
//! drift away from the condition it encodes.

mod constraints;
mod penalties;

use std::collections::HashMap;
use std::rc::Rc;

use russcip::{Model, ObjSense, ProblemCreated, VarType, Variable};

use crewplan_core::domain::{Instance, Weights};
use crewplan_core::eligibility::Eligibility;
use crewplan_core::error::Result;

/// Which encoding to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Hard constraints plus penalty encodings and weighted objective.
    #[default]
    Full,
    /// Hard constraints only, zero objective: answers "does any legal
    /// roster exist?" without optimizing.
    FeasibilityOnly,
}

/// Variable and constraint counts, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub assignment_vars: usize,
    pub work_vars: usize,
    pub penalty_vars: usize,
    pub constraints: usize,
}

/// A built, not yet solved rostering model.
pub struct RosterModel {
    pub(crate) scip: Model<ProblemCreated>,
    /// (crew index, duty index) -> assignment variable.
    pub(crate) x: HashMap<(usize, usize), Rc<Variable>>,
    pub(crate) kind: ModelKind,
    pub(crate) stats: ModelStats,
}

impl RosterModel {
    /// Builds the full model for a validated instance.
    pub fn build(
        instance: &Instance,
        eligibility: &Eligibility,
        conflicts: &[(usize, usize)],
    ) -> Result<RosterModel> {
        Self::build_with_kind(instance, eligibility, conflicts, ModelKind::Full)
    }

    /// Builds the model with an explicit [`ModelKind`].
    pub fn build_with_kind(
        instance: &Instance,
        eligibility: &Eligibility,
        conflicts: &[(usize, usize)],
        kind: ModelKind,
    ) -> Result<RosterModel> {
        let scip = Model::new()
            .hide_output()
            .include_default_plugins()
            .create_prob("crew_rostering")
            .set_obj_sense(ObjSense::Minimize);

        // Penalty weights drive objective coefficients; a feasibility
        // model is the same problem with every weight at zero.
        let obj_weights = match kind {
            ModelKind::Full => instance.scenario.weights,
            ModelKind::FeasibilityOnly => Weights::default(),
        };

        let mut ctx = ModelCtx {
            instance,
            eligibility,
            conflicts,
            obj_weights,
            scip,
            x: HashMap::new(),
            duties_by_crew_day: HashMap::new(),
            work: HashMap::new(),
            totals: Vec::new(),
            n_penalty_vars: 0,
            n_constraints: 0,
        };

        ctx.declare_assignment_vars();
        constraints::add_coverage(&mut ctx);
        constraints::add_conflict_exclusion(&mut ctx);
        constraints::add_workload(&mut ctx);
        constraints::link_work_indicators(&mut ctx);
        constraints::add_consecutive_day_cap(&mut ctx);
        penalties::add_fairness_bounds(&mut ctx);
        penalties::add_weekly_rest_shortfall(&mut ctx);
        penalties::add_late_to_early(&mut ctx);

        let stats = ModelStats {
            assignment_vars: ctx.x.len(),
            work_vars: ctx.work.len(),
            penalty_vars: ctx.n_penalty_vars,
            constraints: ctx.n_constraints,
        };
        tracing::debug!(
            assignment_vars = stats.assignment_vars,
            work_vars = stats.work_vars,
            penalty_vars = stats.penalty_vars,
            constraints = stats.constraints,
            ?kind,
            "built rostering model"
        );

        Ok(RosterModel {
            scip: ctx.scip,
            x: ctx.x,
            kind,
            stats,
        })
    }

    pub fn stats(&self) -> ModelStats {
        self.stats
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }
}

/// Shared state threaded through the build phases.
pub(crate) struct ModelCtx<'a> {
    pub instance: &'a Instance,
    pub eligibility: &'a Eligibility,
    pub conflicts: &'a [(usize, usize)],
    pub obj_weights: Weights,
    pub scip: Model<ProblemCreated>,
    pub x: HashMap<(usize, usize), Rc<Variable>>,
    /// Eligible duty indices per (crew, day), in duty order.
    pub duties_by_crew_day: HashMap<(usize, u32), Vec<usize>>,
    pub work: HashMap<(usize, u32), Rc<Variable>>,
    pub totals: Vec<Rc<Variable>>,
    pub n_penalty_vars: usize,
    pub n_constraints: usize,
}

impl ModelCtx<'_> {
    /// Declares `x[c,d]` for every eligible pair and indexes eligible
    /// duties by (crew, day) for the work-indicator linkage.
    fn declare_assignment_vars(&mut self) {
        for (ci, c) in self.instance.crew.iter().enumerate() {
            for (di, d) in self.instance.duties.iter().enumerate() {
                if !self.eligibility.is_eligible(ci, di) {
                    continue;
                }
                let name = format!("x[{},{}]", c.crew_id, d.duty_id);
                let var = self.scip.add_var(0.0, 1.0, 0.0, &name, VarType::Binary);
                self.x.insert((ci, di), var);
                self.duties_by_crew_day
                    .entry((ci, d.day))
                    .or_default()
                    .push(di);
            }
        }
    }

    pub fn add_penalty_var(
        &mut self,
        lb: f64,
        ub: f64,
        obj: f64,
        name: &str,
        ty: VarType,
    ) -> Rc<Variable> {
        self.n_penalty_vars += 1;
        self.scip.add_var(lb, ub, obj, name, ty)
    }

    /// Adds `lhs <= coefs . vars <= rhs` and counts it.
    pub fn add_cons(&mut self, vars: Vec<&Rc<Variable>>, coefs: &[f64], lhs: f64, rhs: f64, name: &str) {
        debug_assert_eq!(vars.len(), coefs.len());
        self.scip.add_cons(vars, coefs, lhs, rhs, name);
        self.n_constraints += 1;
    }
}
