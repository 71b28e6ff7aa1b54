//! Unit tests for the domain types.

use super::*;

fn duty(day: u32, start_min: i64, end_min: i64) -> Duty {
    Duty {
        duty_id: format!("D{day}-{start_min}"),
        day,
        start_min,
        end_min,
        base: "CDG".into(),
        aircraft_type: "A320".into(),
        coverage: BTreeMap::from([(Role::Capt, 1)]),
    }
}

#[test]
fn test_duty_duration_and_absolute_minutes() {
    let d = duty(3, 600, 720);
    assert_eq!(d.duration_min(), 120);
    assert_eq!(d.abs_start_min(), 2 * MINUTES_PER_DAY + 600);
    assert_eq!(d.abs_end_min(), 2 * MINUTES_PER_DAY + 720);
}

#[test]
fn test_week_partition_exact_weeks() {
    let s = scenario(14);
    assert_eq!(s.num_weeks(), 2);
    assert_eq!(s.week_days(0), 1..=7);
    assert_eq!(s.week_days(1), 8..=14);
}

#[test]
fn test_week_partition_partial_last_week() {
    let s = scenario(10);
    assert_eq!(s.num_weeks(), 2);
    assert_eq!(s.week_days(0), 1..=7);
    assert_eq!(s.week_days(1), 8..=10);
}

#[test]
fn test_role_serialization_uses_wire_names() {
    assert_eq!(serde_json::to_string(&Role::Capt).unwrap(), "\"CAPT\"");
    assert_eq!(serde_json::to_string(&Role::Fo).unwrap(), "\"FO\"");
    assert_eq!(serde_json::from_str::<Role>("\"FA\"").unwrap(), Role::Fa);
    assert!(serde_json::from_str::<Role>("\"PILOT\"").is_err());
}

#[test]
fn test_scenario_defaults_for_optional_fields() {
    let s: Scenario = serde_json::from_str(
        r#"{
            "horizon_days": 7,
            "min_rest_minutes": 660,
            "max_consecutive_work_days": 5
        }"#,
    )
    .unwrap();
    assert_eq!(s.min_rest_days_per_week, 0);
    assert_eq!(s.late_end_threshold_min, 1200);
    assert_eq!(s.early_start_threshold_min, 480);
    assert_eq!(s.weights, Weights::default());
}

fn scenario(horizon_days: u32) -> Scenario {
    Scenario {
        horizon_days,
        min_rest_minutes: 660,
        max_consecutive_work_days: 5,
        min_rest_days_per_week: 1,
        late_end_threshold_min: 1200,
        early_start_threshold_min: 480,
        weights: Weights::default(),
    }
}
