//! Advisory coverage feasibility check.
//!
//! For each duty and required role, counts the eligible crew of that
//! role. A deficit means the instance cannot be covered and will solve
//! to INFEASIBLE; reporting the gap up front makes the cause visible.
//! The model builder never consults this check.

use serde::Serialize;

use crate::domain::{Instance, Role};
use crate::eligibility::Eligibility;

/// One duty/role slot with fewer eligible crew than required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageIssue {
    pub duty_id: String,
    pub day: u32,
    pub role: Role,
    pub required: u32,
    pub eligible_count: u32,
    pub eligible_crew_ids: Vec<String>,
}

/// Returns all coverage deficits, most severe first (largest gap), then
/// by day, duty and role. Empty means coverage is feasible in principle.
pub fn check_coverage(instance: &Instance, eligibility: &Eligibility) -> Vec<CoverageIssue> {
    let mut issues = Vec::new();

    for (di, d) in instance.duties.iter().enumerate() {
        for (&role, &required) in &d.coverage {
            let mut eligible_crew_ids: Vec<String> = instance
                .crew
                .iter()
                .enumerate()
                .filter(|(ci, c)| c.role == role && eligibility.is_eligible(*ci, di))
                .map(|(_, c)| c.crew_id.clone())
                .collect();
            eligible_crew_ids.sort();

            let eligible_count = eligible_crew_ids.len() as u32;
            if eligible_count < required {
                issues.push(CoverageIssue {
                    duty_id: d.duty_id.clone(),
                    day: d.day,
                    role,
                    required,
                    eligible_count,
                    eligible_crew_ids,
                });
            }
        }
    }

    issues.sort_by_key(|i| {
        (
            i64::from(i.eligible_count) - i64::from(i.required),
            i.day,
            i.duty_id.clone(),
            i.role,
        )
    });
    issues
}
