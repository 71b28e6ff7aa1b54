//! Fail-fast instance validation.
//!
//! The model builder assumes a validated instance; every violation here
//! is fatal and reported before any model is built. Coverage
//! *satisfiability* is deliberately not checked: that is the solver's
//! job (an unsatisfiable instance solves to INFEASIBLE).

use std::collections::HashSet;

use crate::domain::{Instance, MINUTES_PER_DAY};
use crate::error::{Result, RosterError};

/// Validates crew, duties and off-requests against the scenario.
pub fn validate_instance(instance: &Instance) -> Result<()> {
    let horizon_days = instance.scenario.horizon_days;
    if horizon_days == 0 {
        return Err(invalid("horizon_days must be >= 1"));
    }
    if instance.scenario.min_rest_minutes < 0 {
        return Err(invalid("min_rest_minutes must be >= 0"));
    }

    let mut crew_ids = HashSet::new();
    for c in &instance.crew {
        if !crew_ids.insert(c.crew_id.as_str()) {
            return Err(invalid(format!("duplicate crew_id {}", c.crew_id)));
        }
        if c.max_minutes <= 0 {
            return Err(invalid(format!(
                "max_minutes must be > 0 for crew {}",
                c.crew_id
            )));
        }
        if c.qualified_types.is_empty() {
            return Err(invalid(format!(
                "qualified_types empty for crew {}",
                c.crew_id
            )));
        }
    }

    let mut duty_ids = HashSet::new();
    for d in &instance.duties {
        if !duty_ids.insert(d.duty_id.as_str()) {
            return Err(invalid(format!("duplicate duty_id {}", d.duty_id)));
        }
        if !(1..=horizon_days).contains(&d.day) {
            return Err(invalid(format!(
                "duty {} has day {} outside 1..={horizon_days}",
                d.duty_id, d.day
            )));
        }
        if !(0..MINUTES_PER_DAY).contains(&d.start_min)
            || !(0..=MINUTES_PER_DAY).contains(&d.end_min)
        {
            return Err(invalid(format!(
                "duty {} has start/end outside the day",
                d.duty_id
            )));
        }
        if d.end_min <= d.start_min {
            return Err(invalid(format!(
                "duty {} end_min must be > start_min",
                d.duty_id
            )));
        }
        if d.coverage.is_empty() {
            return Err(invalid(format!("duty {} has empty coverage", d.duty_id)));
        }
        for (role, k) in &d.coverage {
            if *k == 0 {
                return Err(invalid(format!(
                    "duty {} requires zero crew for role {role}",
                    d.duty_id
                )));
            }
        }
    }

    for r in &instance.off_requests {
        if !crew_ids.contains(r.crew_id.as_str()) {
            return Err(invalid(format!(
                "off-request references unknown crew {}",
                r.crew_id
            )));
        }
        if !(1..=horizon_days).contains(&r.day) {
            return Err(invalid(format!(
                "off-request for crew {} has day {} outside 1..={horizon_days}",
                r.crew_id, r.day
            )));
        }
        if r.penalty < 0 {
            return Err(invalid(format!(
                "off-request for crew {} has negative penalty",
                r.crew_id
            )));
        }
    }

    Ok(())
}

fn invalid(msg: impl Into<String>) -> RosterError {
    RosterError::InvalidInstance(msg.into())
}
