//! Solution and report writers.
//!
//! JSON carries the machine-readable solution and objective breakdown;
//! the CSV tables mirror what downstream analysis expects: a crew-by-day
//! work matrix, per-crew workloads, weekly rest accounting and
//! off-request outcomes.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crewplan_core::domain::Instance;
use crewplan_core::error::Result;
use crewplan_solver::{PenaltyCategory, RosterResult, SolveOutcome};

/// Writes all solution/report files under `out`, returning the paths.
pub fn write_reports(out: &Path, instance: &Instance, outcome: &SolveOutcome) -> Result<Vec<PathBuf>> {
    let Some(result) = &outcome.result else {
        return Ok(Vec::new());
    };

    let sol_dir = out.join("solutions");
    let rep_dir = out.join("report");
    std::fs::create_dir_all(&sol_dir)?;
    std::fs::create_dir_all(&rep_dir)?;

    let mut written = Vec::new();

    let solution_path = sol_dir.join("rostering_solution.json");
    std::fs::write(&solution_path, solution_json(outcome, result)?)?;
    written.push(solution_path);

    let breakdown_path = rep_dir.join("objective_breakdown.json");
    std::fs::write(
        &breakdown_path,
        serde_json::to_string_pretty(&result.breakdown)?,
    )?;
    written.push(breakdown_path);

    let matrix_path = rep_dir.join("work_matrix.csv");
    std::fs::write(&matrix_path, work_matrix_csv(instance, result))?;
    written.push(matrix_path);

    let workloads_path = rep_dir.join("workloads.csv");
    std::fs::write(&workloads_path, workloads_csv(result))?;
    written.push(workloads_path);

    let weekly_path = rep_dir.join("weekly_rest.csv");
    std::fs::write(&weekly_path, weekly_rest_csv(result))?;
    written.push(weekly_path);

    let off_path = rep_dir.join("off_requests.csv");
    std::fs::write(&off_path, off_requests_csv(result))?;
    written.push(off_path);

    Ok(written)
}

fn solution_json(outcome: &SolveOutcome, result: &RosterResult) -> Result<String> {
    let value_of = |category: PenaltyCategory| {
        result
            .breakdown
            .terms
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.value)
            .unwrap_or(0)
    };
    let payload = serde_json::json!({
        "status": outcome.status,
        "objective_value": result.objective_value,
        "kpis": {
            "spread": value_of(PenaltyCategory::FairnessSpread),
            "worked_days": value_of(PenaltyCategory::WorkedDays),
            "preference_cost": value_of(PenaltyCategory::OffRequest),
            "weekly_rest_shortfall": value_of(PenaltyCategory::WeeklyRestShortfall),
            "late_to_early_total": value_of(PenaltyCategory::LateToEarly),
        },
        "assignments": &result.assigned_by_duty,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Crew-by-day 0/1 matrix of worked days.
fn work_matrix_csv(instance: &Instance, result: &RosterResult) -> String {
    let duty_days = instance.duty_index_by_id();
    let horizon = instance.scenario.horizon_days;

    let mut csv = String::from("crew_id");
    for day in 1..=horizon {
        let _ = write!(csv, ",{day}");
    }
    csv.push('\n');

    for (crew_id, duty_ids) in &result.assignments {
        let worked: BTreeSet<u32> = duty_ids
            .iter()
            .filter_map(|id| duty_days.get(id.as_str()))
            .map(|&di| instance.duties[di].day)
            .collect();
        let _ = write!(csv, "{crew_id}");
        for day in 1..=horizon {
            let _ = write!(csv, ",{}", u8::from(worked.contains(&day)));
        }
        csv.push('\n');
    }
    csv
}

fn workloads_csv(result: &RosterResult) -> String {
    let mut rows: Vec<_> = result.kpis.iter().collect();
    rows.sort_by_key(|k| (k.role, k.crew_id.clone()));

    let mut csv = String::from("crew_id,role,total_minutes,worked_days\n");
    for kpi in rows {
        let _ = writeln!(
            csv,
            "{},{},{},{}",
            kpi.crew_id, kpi.role, kpi.total_minutes, kpi.worked_days
        );
    }
    csv
}

fn weekly_rest_csv(result: &RosterResult) -> String {
    let mut csv = String::from(
        "crew_id,week,start_day,end_day,worked_days,rest_days,required_rest_days,shortfall\n",
    );
    for kpi in &result.kpis {
        for week in &kpi.weekly_rest {
            let _ = writeln!(
                csv,
                "{},{},{},{},{},{},{},{}",
                kpi.crew_id,
                week.week,
                week.start_day,
                week.end_day,
                week.worked_days,
                week.rest_days,
                week.required_rest_days,
                week.shortfall
            );
        }
    }
    csv
}

fn off_requests_csv(result: &RosterResult) -> String {
    let mut csv = String::from("crew_id,day,penalty,worked,cost\n");
    for o in &result.off_request_outcomes {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            o.crew_id,
            o.day,
            o.penalty,
            u8::from(o.worked),
            o.cost
        );
    }
    csv
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crewplan_core::domain::{
        CrewMember, Duty, Role, Scenario, Weights,
    };
    use crewplan_solver::{
        CrewKpi, ObjectiveBreakdown, PenaltyTerm, SolveStatus, WeekRest,
    };

    use super::*;

    fn small_outcome() -> (Instance, SolveOutcome) {
        let instance = Instance {
            scenario: Scenario {
                horizon_days: 7,
                min_rest_minutes: 660,
                max_consecutive_work_days: 5,
                min_rest_days_per_week: 1,
                late_end_threshold_min: 1200,
                early_start_threshold_min: 480,
                weights: Weights::default(),
            },
            crew: vec![CrewMember {
                crew_id: "C1".into(),
                role: Role::Capt,
                base: "CDG".into(),
                qualified_types: vec!["A320".into()],
                max_minutes: 6000,
            }],
            duties: vec![Duty {
                duty_id: "D1".into(),
                day: 2,
                start_min: 480,
                end_min: 960,
                base: "CDG".into(),
                aircraft_type: "A320".into(),
                coverage: BTreeMap::from([(Role::Capt, 1)]),
            }],
            off_requests: vec![],
        };

        let terms: Vec<PenaltyTerm> = crewplan_solver::PenaltyCategory::ALL
            .iter()
            .map(|&category| PenaltyTerm {
                category,
                weight: 0,
                value: if category == PenaltyCategory::WorkedDays {
                    1
                } else {
                    0
                },
                contribution: 0,
            })
            .collect();
        let result = RosterResult {
            objective_value: 0,
            assignments: BTreeMap::from([("C1".to_string(), vec!["D1".to_string()])]),
            assigned_by_duty: BTreeMap::from([("D1".to_string(), vec!["C1".to_string()])]),
            kpis: vec![CrewKpi {
                crew_id: "C1".into(),
                role: Role::Capt,
                total_minutes: 480,
                worked_days: 1,
                weekly_rest: vec![WeekRest {
                    week: 1,
                    start_day: 1,
                    end_day: 7,
                    worked_days: 1,
                    rest_days: 6,
                    required_rest_days: 1,
                    shortfall: 0,
                }],
            }],
            off_request_outcomes: vec![],
            breakdown: ObjectiveBreakdown {
                objective_value: 0,
                terms,
            },
        };
        (
            instance,
            SolveOutcome {
                status: SolveStatus::Optimal,
                result: Some(result),
            },
        )
    }

    #[test]
    fn test_write_reports_creates_all_files() {
        let (instance, outcome) = small_outcome();
        let tmp = tempfile::tempdir().unwrap();
        let written = write_reports(tmp.path(), &instance, &outcome).unwrap();
        assert_eq!(written.len(), 6);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }

        let matrix = std::fs::read_to_string(tmp.path().join("report/work_matrix.csv")).unwrap();
        let mut lines = matrix.lines();
        assert_eq!(lines.next().unwrap(), "crew_id,1,2,3,4,5,6,7");
        assert_eq!(lines.next().unwrap(), "C1,0,1,0,0,0,0,0");

        let solution: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join("solutions/rostering_solution.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(solution["status"], "OPTIMAL");
        assert_eq!(solution["kpis"]["worked_days"], 1);
        assert_eq!(solution["assignments"]["D1"][0], "C1");
    }

    #[test]
    fn test_no_result_writes_nothing() {
        let (instance, _) = small_outcome();
        let outcome = SolveOutcome {
            status: SolveStatus::Infeasible,
            result: None,
        };
        let tmp = tempfile::tempdir().unwrap();
        let written = write_reports(tmp.path(), &instance, &outcome).unwrap();
        assert!(written.is_empty());
    }
}
