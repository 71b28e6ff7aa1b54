//! Penalty encodings: auxiliary variables whose value equals the
//! magnitude of each soft-constraint violation.
//!
//! Every derived boolean is linked in both directions; the bounding
//! variables (fairness, shortfall) are tied by the objective pressure of
//! their own weight. Categories with weight zero are not encoded at all:
//! their magnitude is still reported by the extractor, which recomputes
//! it from the assignment.

use std::rc::Rc;

use russcip::{VarType, Variable};

use super::ModelCtx;

/// Fairness spread: `max_load >= total_minutes[c]` and
/// `min_load <= total_minutes[c]` for every crew member, with objective
/// coefficients `+w` and `-w`, so minimizing pulls the pair onto the
/// actual maximum and minimum.
pub(super) fn add_fairness_bounds(ctx: &mut ModelCtx<'_>) {
    let w = ctx.obj_weights.fairness_spread;
    if w == 0 || ctx.instance.crew.is_empty() {
        return;
    }

    let max_cap = ctx
        .instance
        .crew
        .iter()
        .map(|c| c.max_minutes)
        .max()
        .unwrap_or(0) as f64;

    let max_load = ctx.add_penalty_var(0.0, max_cap, w as f64, "max_load", VarType::Integer);
    let min_load = ctx.add_penalty_var(0.0, max_cap, -(w as f64), "min_load", VarType::Integer);

    for (ci, c) in ctx.instance.crew.iter().enumerate() {
        let total = ctx.totals[ci].clone();
        let name = format!("max_load_ge[{}]", c.crew_id);
        ctx.add_cons(
            vec![&max_load, &total],
            &[1.0, -1.0],
            0.0,
            f64::INFINITY,
            &name,
        );
        let name = format!("min_load_le[{}]", c.crew_id);
        ctx.add_cons(
            vec![&min_load, &total],
            &[1.0, -1.0],
            -f64::INFINITY,
            0.0,
            &name,
        );
    }
}

/// Weekly rest shortfall: for every crew member and 7-day block, an
/// integer aux bounded below by `min_rest - rest_days_in_week` and by
/// zero. Rest days are the block's day count minus its worked days, so
/// the bound is linear in the work indicators.
pub(super) fn add_weekly_rest_shortfall(ctx: &mut ModelCtx<'_>) {
    let w = ctx.obj_weights.weekly_rest_shortfall;
    let min_rest = ctx.instance.scenario.min_rest_days_per_week;
    if w == 0 || min_rest == 0 {
        return;
    }

    for (ci, c) in ctx.instance.crew.iter().enumerate() {
        for week in 0..ctx.instance.scenario.num_weeks() {
            let days = ctx.instance.scenario.week_days(week);
            let days_in_week = days.clone().count() as i64;

            let name = format!("rest_shortfall[{},w{}]", c.crew_id, week + 1);
            let shortfall =
                ctx.add_penalty_var(0.0, f64::from(min_rest), w as f64, &name, VarType::Integer);

            // shortfall >= min_rest - (days_in_week - sum work)
            let mut vars: Vec<Rc<Variable>> = vec![shortfall];
            let mut coefs = vec![1.0];
            for day in days {
                vars.push(ctx.work[&(ci, day)].clone());
                coefs.push(-1.0);
            }
            let refs: Vec<&Rc<Variable>> = vars.iter().collect();
            let lhs = i64::from(min_rest) - days_in_week;
            let name = format!("rest_shortfall_ge[{},w{}]", c.crew_id, week + 1);
            ctx.add_cons(refs, &coefs, lhs as f64, f64::INFINITY, &name);
        }
    }
}

/// Late-to-early fatigue sequences: `late_work[c,day]` is an OR over the
/// day's assigned duties ending at or after the late threshold,
/// `early_work[c,day+1]` an OR over the next day's duties starting at or
/// before the early threshold, and `late_to_early` their AND via the
/// standard implication triple. Day pairs where either operand set is
/// empty (including the last horizon day) get no variables.
pub(super) fn add_late_to_early(ctx: &mut ModelCtx<'_>) {
    let w = ctx.obj_weights.late_to_early;
    if w == 0 {
        return;
    }
    let late_threshold = ctx.instance.scenario.late_end_threshold_min;
    let early_threshold = ctx.instance.scenario.early_start_threshold_min;

    for (ci, c) in ctx.instance.crew.iter().enumerate() {
        for day in 1..ctx.instance.scenario.horizon_days {
            let late_set = qualifying(ctx, ci, day, |d| {
                ctx.instance.duties[d].end_min >= late_threshold
            });
            if late_set.is_empty() {
                continue;
            }
            let early_set = qualifying(ctx, ci, day + 1, |d| {
                ctx.instance.duties[d].start_min <= early_threshold
            });
            if early_set.is_empty() {
                continue;
            }

            let late = or_indicator(ctx, ci, &late_set, &format!("late_work[{},{day}]", c.crew_id));
            let early = or_indicator(
                ctx,
                ci,
                &early_set,
                &format!("early_work[{},{}]", c.crew_id, day + 1),
            );

            let name = format!("late_to_early[{},{day}]", c.crew_id);
            let lte = ctx.add_penalty_var(0.0, 1.0, w as f64, &name, VarType::Binary);

            // lte = late AND early
            let name = format!("lte_and_ge[{},{day}]", c.crew_id);
            ctx.add_cons(
                vec![&lte, &late, &early],
                &[1.0, -1.0, -1.0],
                -1.0,
                f64::INFINITY,
                &name,
            );
            let name = format!("lte_le_late[{},{day}]", c.crew_id);
            ctx.add_cons(vec![&lte, &late], &[1.0, -1.0], -f64::INFINITY, 0.0, &name);
            let name = format!("lte_le_early[{},{day}]", c.crew_id);
            ctx.add_cons(vec![&lte, &early], &[1.0, -1.0], -f64::INFINITY, 0.0, &name);
        }
    }
}

/// Eligible duty indices of (crew, day) satisfying `pred`.
fn qualifying(
    ctx: &ModelCtx<'_>,
    crew: usize,
    day: u32,
    pred: impl Fn(usize) -> bool,
) -> Vec<usize> {
    ctx.duties_by_crew_day
        .get(&(crew, day))
        .map(|idxs| idxs.iter().copied().filter(|&d| pred(d)).collect())
        .unwrap_or_default()
}

/// Declares a boolean equal to the OR of the crew member's assignment
/// variables for the given duties, linked in both directions.
fn or_indicator(
    ctx: &mut ModelCtx<'_>,
    crew: usize,
    duty_idxs: &[usize],
    name: &str,
) -> Rc<Variable> {
    let indicator = ctx.add_penalty_var(0.0, 1.0, 0.0, name, VarType::Binary);

    let mut sum_vars: Vec<Rc<Variable>> = vec![indicator.clone()];
    let mut sum_coefs = vec![1.0];
    for &di in duty_idxs {
        let x = ctx.x[&(crew, di)].clone();
        let ge_name = format!("{name}_ge_{di}");
        ctx.add_cons(
            vec![&indicator, &x],
            &[1.0, -1.0],
            0.0,
            f64::INFINITY,
            &ge_name,
        );
        sum_vars.push(x);
        sum_coefs.push(-1.0);
    }
    let refs: Vec<&Rc<Variable>> = sum_vars.iter().collect();
    let le_name = format!("{name}_le");
    ctx.add_cons(refs, &sum_coefs, -f64::INFINITY, 0.0, &le_name);

    indicator
}
