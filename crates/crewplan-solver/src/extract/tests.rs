//! Unit tests for the pure recomputation in the extractor.

use std::collections::BTreeMap;

use crewplan_core::domain::{CrewMember, Duty, OffRequest, Scenario, Weights};

use super::*;

fn crew(id: &str, role: Role) -> CrewMember {
    CrewMember {
        crew_id: id.into(),
        role,
        base: "CDG".into(),
        qualified_types: vec!["A320".into()],
        max_minutes: 10_000,
    }
}

fn duty(id: &str, day: u32, start_min: i64, end_min: i64) -> Duty {
    Duty {
        duty_id: id.into(),
        day,
        start_min,
        end_min,
        base: "CDG".into(),
        aircraft_type: "A320".into(),
        coverage: BTreeMap::from([(Role::Capt, 1)]),
    }
}

fn instance(crew: Vec<CrewMember>, duties: Vec<Duty>, weights: Weights) -> Instance {
    Instance {
        scenario: Scenario {
            horizon_days: 10,
            min_rest_minutes: 0,
            max_consecutive_work_days: 9,
            min_rest_days_per_week: 2,
            late_end_threshold_min: 1200,
            early_start_threshold_min: 480,
            weights,
        },
        crew,
        duties,
        off_requests: vec![],
    }
}

#[test]
fn test_kpis_and_roster_maps() {
    let inst = instance(
        vec![crew("C1", Role::Capt), crew("C2", Role::Capt)],
        vec![
            duty("D1", 1, 480, 960),
            duty("D2", 2, 480, 720),
            duty("D3", 4, 480, 720),
        ],
        Weights::default(),
    );
    let result = extract(&inst, &[vec![0, 1], vec![2]], 0, true, &Weights::default()).unwrap();

    assert_eq!(result.assignments["C1"], vec!["D1", "D2"]);
    assert_eq!(result.assignments["C2"], vec!["D3"]);
    assert_eq!(result.assigned_by_duty["D1"], vec!["C1"]);

    let c1 = &result.kpis[0];
    assert_eq!(c1.total_minutes, 480 + 240);
    assert_eq!(c1.worked_days, 2);
    let c2 = &result.kpis[1];
    assert_eq!(c2.total_minutes, 240);
    assert_eq!(c2.worked_days, 1);
}

#[test]
fn test_weekly_rest_rows_with_partial_last_week() {
    let inst = instance(
        vec![crew("C1", Role::Capt)],
        vec![
            duty("D1", 1, 480, 720),
            duty("D2", 2, 480, 720),
            duty("D3", 3, 480, 720),
            duty("D4", 4, 480, 720),
            duty("D5", 5, 480, 720),
            duty("D6", 6, 480, 720),
            duty("D7", 9, 480, 720),
        ],
        Weights::default(),
    );
    let result = extract(
        &inst,
        &[vec![0, 1, 2, 3, 4, 5, 6]],
        0,
        true,
        &Weights::default(),
    )
    .unwrap();

    let weeks = &result.kpis[0].weekly_rest;
    assert_eq!(weeks.len(), 2);
    // week 1: six worked days, one rest day, required two
    assert_eq!(weeks[0].worked_days, 6);
    assert_eq!(weeks[0].rest_days, 1);
    assert_eq!(weeks[0].shortfall, 1);
    // week 2 spans days 8..=10 only
    assert_eq!(weeks[1].start_day, 8);
    assert_eq!(weeks[1].end_day, 10);
    assert_eq!(weeks[1].worked_days, 1);
    assert_eq!(weeks[1].rest_days, 2);
    assert_eq!(weeks[1].shortfall, 0);
}

#[test]
fn test_fairness_spread_and_breakdown_sum() {
    let weights = Weights {
        fairness_spread: 3,
        worked_days: 10,
        ..Weights::default()
    };
    let inst = instance(
        vec![crew("C1", Role::Capt), crew("C2", Role::Capt)],
        vec![duty("D1", 1, 480, 960), duty("D2", 3, 480, 720)],
        weights,
    );
    // C1 works 480 minutes, C2 240: spread 240, worked days 2
    let expected = 3 * 240 + 10 * 2;
    let result = extract(&inst, &[vec![0], vec![1]], expected, true, &weights).unwrap();

    assert_eq!(result.objective_value, expected);
    assert_eq!(result.breakdown.total_from_terms(), expected);
    let spread = &result.breakdown.terms[0];
    assert_eq!(spread.value, 240);
    assert_eq!(spread.contribution, 720);
}

#[test]
fn test_off_request_outcomes() {
    let mut inst = instance(
        vec![crew("C1", Role::Capt)],
        vec![duty("D1", 2, 480, 720)],
        Weights {
            off_request: 2,
            ..Weights::default()
        },
    );
    inst.off_requests = vec![
        OffRequest {
            crew_id: "C1".into(),
            day: 2,
            penalty: 7,
        },
        OffRequest {
            crew_id: "C1".into(),
            day: 5,
            penalty: 9,
        },
    ];
    let weights = inst.scenario.weights;
    let result = extract(&inst, &[vec![0]], 14, true, &weights).unwrap();

    assert_eq!(result.off_request_outcomes.len(), 2);
    assert!(result.off_request_outcomes[0].worked);
    assert_eq!(result.off_request_outcomes[0].cost, 7);
    assert!(!result.off_request_outcomes[1].worked);
    assert_eq!(result.off_request_outcomes[1].cost, 0);
    // raw value 7, weighted by the global off_request weight
    assert_eq!(result.objective_value, 14);
}

#[test]
fn test_late_to_early_counting() {
    let inst = instance(
        vec![crew("C1", Role::Capt)],
        vec![
            duty("L1", 1, 900, 1260),  // ends 21:00 -> late
            duty("E2", 2, 420, 700),   // starts 07:00 -> early
            duty("L9", 10, 900, 1260), // late on the last day: no successor
        ],
        Weights {
            late_to_early: 5,
            ..Weights::default()
        },
    );
    let weights = inst.scenario.weights;
    let result = extract(&inst, &[vec![0, 1, 2]], 5, true, &weights).unwrap();
    let fatigue = result
        .breakdown
        .terms
        .iter()
        .find(|t| t.category == PenaltyCategory::LateToEarly)
        .unwrap();
    assert_eq!(fatigue.value, 1);
    assert_eq!(fatigue.contribution, 5);
}

#[test]
fn test_optimal_mismatch_is_an_error() {
    let inst = instance(
        vec![crew("C1", Role::Capt)],
        vec![duty("D1", 1, 480, 720)],
        Weights {
            worked_days: 1,
            ..Weights::default()
        },
    );
    let weights = inst.scenario.weights;
    let err = extract(&inst, &[vec![0]], 99, true, &weights).unwrap_err();
    assert!(matches!(err, RosterError::Inconsistent(_)));
}

#[test]
fn test_feasible_incumbent_may_overstate_objective() {
    let inst = instance(
        vec![crew("C1", Role::Capt)],
        vec![duty("D1", 1, 480, 720)],
        Weights {
            worked_days: 1,
            ..Weights::default()
        },
    );
    let weights = inst.scenario.weights;
    // solver incumbent reports 5 with slack; the roster's true cost is 1
    let result = extract(&inst, &[vec![0]], 5, false, &weights).unwrap();
    assert_eq!(result.objective_value, 1);
}

#[test]
fn test_recomputed_total_above_solver_objective_is_an_error() {
    let inst = instance(
        vec![crew("C1", Role::Capt)],
        vec![duty("D1", 1, 480, 720)],
        Weights {
            worked_days: 1,
            ..Weights::default()
        },
    );
    let weights = inst.scenario.weights;
    let err = extract(&inst, &[vec![0]], 0, false, &weights).unwrap_err();
    assert!(matches!(err, RosterError::Inconsistent(_)));
}
