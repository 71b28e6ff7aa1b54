//! Hard constraints over the assignment variables.

use std::rc::Rc;

use russcip::{VarType, Variable};

use super::ModelCtx;

/// Exact per-role coverage: for every duty and required role, the sum of
/// assignment variables over eligible crew of that role equals the
/// required count. The constraint is emitted even when no eligible crew
/// exists, which makes a shortage structurally infeasible rather than
/// silently under-staffed.
pub(super) fn add_coverage(ctx: &mut ModelCtx<'_>) {
    for (di, d) in ctx.instance.duties.iter().enumerate() {
        for (&role, &required) in &d.coverage {
            let vars: Vec<Rc<Variable>> = ctx
                .instance
                .crew
                .iter()
                .enumerate()
                .filter(|(_, c)| c.role == role)
                .filter_map(|(ci, _)| ctx.x.get(&(ci, di)).cloned())
                .collect();
            let refs: Vec<&Rc<Variable>> = vars.iter().collect();
            let coefs = vec![1.0; refs.len()];
            let required = f64::from(required);
            let name = format!("cover[{},{role}]", d.duty_id);
            ctx.add_cons(refs, &coefs, required, required, &name);
        }
    }
}

/// Conflict exclusion: a crew member eligible for two conflicting duties
/// may take at most one of them.
pub(super) fn add_conflict_exclusion(ctx: &mut ModelCtx<'_>) {
    for &(d1, d2) in ctx.conflicts {
        for ci in 0..ctx.instance.crew.len() {
            let (Some(v1), Some(v2)) = (ctx.x.get(&(ci, d1)), ctx.x.get(&(ci, d2))) else {
                continue;
            };
            let (v1, v2) = (v1.clone(), v2.clone());
            let name = format!(
                "conflict[{},{},{}]",
                ctx.instance.crew[ci].crew_id,
                ctx.instance.duties[d1].duty_id,
                ctx.instance.duties[d2].duty_id
            );
            ctx.add_cons(vec![&v1, &v2], &[1.0, 1.0], -f64::INFINITY, 1.0, &name);
        }
    }
}

/// Workload linkage and cap: `total_minutes[c]` equals the summed
/// duration of assigned duties, with the crew member's `max_minutes` as
/// the variable's upper bound.
pub(super) fn add_workload(ctx: &mut ModelCtx<'_>) {
    for (ci, c) in ctx.instance.crew.iter().enumerate() {
        let name = format!("total_minutes[{}]", c.crew_id);
        let total = ctx
            .scip
            .add_var(0.0, c.max_minutes as f64, 0.0, &name, VarType::Integer);

        let mut vars: Vec<Rc<Variable>> = Vec::new();
        let mut coefs: Vec<f64> = Vec::new();
        for (di, d) in ctx.instance.duties.iter().enumerate() {
            if let Some(x) = ctx.x.get(&(ci, di)) {
                vars.push(x.clone());
                coefs.push(d.duration_min() as f64);
            }
        }
        vars.push(total.clone());
        coefs.push(-1.0);

        let refs: Vec<&Rc<Variable>> = vars.iter().collect();
        let name = format!("workload[{}]", c.crew_id);
        ctx.add_cons(refs, &coefs, 0.0, 0.0, &name);

        ctx.totals.push(total);
    }
}

/// Links `work[c,day]` to the assignment variables in both directions:
/// `work >= x` for every eligible duty of that day and `work <= sum x`,
/// so the indicator is true exactly when some duty of the day is
/// assigned. Days without eligible duties get a fixed-zero variable.
///
/// The objective coefficient carries the worked-days weight plus the
/// weighted penalty of any off-request for that (crew, day).
pub(super) fn link_work_indicators(ctx: &mut ModelCtx<'_>) {
    let crew_index = ctx.instance.crew_index_by_id();
    let mut off_penalty: std::collections::HashMap<(usize, u32), i64> =
        std::collections::HashMap::new();
    for r in &ctx.instance.off_requests {
        if let Some(&ci) = crew_index.get(r.crew_id.as_str()) {
            *off_penalty.entry((ci, r.day)).or_insert(0) += r.penalty;
        }
    }

    let w_days = ctx.obj_weights.worked_days;
    let w_off = ctx.obj_weights.off_request;

    for (ci, c) in ctx.instance.crew.iter().enumerate() {
        for day in 1..=ctx.instance.scenario.horizon_days {
            let duty_idxs = ctx
                .duties_by_crew_day
                .get(&(ci, day))
                .cloned()
                .unwrap_or_default();

            let obj = (w_days + w_off * off_penalty.get(&(ci, day)).copied().unwrap_or(0)) as f64;
            let ub = if duty_idxs.is_empty() { 0.0 } else { 1.0 };
            let name = format!("work[{},{day}]", c.crew_id);
            let work = ctx.scip.add_var(0.0, ub, obj, &name, VarType::Binary);

            for &di in &duty_idxs {
                let x = ctx.x[&(ci, di)].clone();
                let name = format!(
                    "work_ge[{},{}]",
                    c.crew_id, ctx.instance.duties[di].duty_id
                );
                ctx.add_cons(vec![&work, &x], &[1.0, -1.0], 0.0, f64::INFINITY, &name);
            }
            if !duty_idxs.is_empty() {
                let mut vars: Vec<Rc<Variable>> = vec![work.clone()];
                let mut coefs = vec![1.0];
                for &di in &duty_idxs {
                    vars.push(ctx.x[&(ci, di)].clone());
                    coefs.push(-1.0);
                }
                let refs: Vec<&Rc<Variable>> = vars.iter().collect();
                let name = format!("work_le[{},{day}]", c.crew_id);
                ctx.add_cons(refs, &coefs, -f64::INFINITY, 0.0, &name);
            }

            ctx.work.insert((ci, day), work);
        }
    }
}

/// Sliding-window consecutive-day cap: in every window of
/// `max_consecutive_work_days + 1` consecutive days, at most
/// `max_consecutive_work_days` may be worked.
pub(super) fn add_consecutive_day_cap(ctx: &mut ModelCtx<'_>) {
    let horizon = ctx.instance.scenario.horizon_days;
    let cap = ctx.instance.scenario.max_consecutive_work_days;
    let window = cap + 1;
    if window > horizon {
        return;
    }

    for (ci, c) in ctx.instance.crew.iter().enumerate() {
        for start in 1..=(horizon - window + 1) {
            let vars: Vec<Rc<Variable>> = (start..start + window)
                .map(|day| ctx.work[&(ci, day)].clone())
                .collect();
            let refs: Vec<&Rc<Variable>> = vars.iter().collect();
            let coefs = vec![1.0; refs.len()];
            let name = format!("max_consecutive[{},{start}]", c.crew_id);
            ctx.add_cons(refs, &coefs, -f64::INFINITY, f64::from(cap), &name);
        }
    }
}
