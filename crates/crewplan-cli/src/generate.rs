//! Synthetic instance generation.
//!
//! Fabricates a small single-base, single-fleet instance: every duty
//! needs one captain, one first officer and two flight attendants, and a
//! handful of crew file off-requests. Generated instances always pass
//! validation.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crewplan_core::domain::{
    CrewMember, Duty, Instance, OffRequest, Role, Scenario, Weights,
};
use crewplan_core::error::Result;
use crewplan_core::validate::validate_instance;

/// Writes `scenario.json`, `crew.json`, `duties.json` and
/// `preferences.json` for a fabricated instance under `out`.
pub fn write_instance(
    out: &Path,
    captains: usize,
    days: u32,
    duties_per_day: usize,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let instance = build(&mut rng, captains, days, duties_per_day);
    validate_instance(&instance)?;

    std::fs::create_dir_all(out)?;
    write_json(out, "scenario.json", &serde_json::to_value(&instance.scenario)?)?;
    write_json(out, "crew.json", &serde_json::json!({ "crew": instance.crew }))?;
    write_json(out, "duties.json", &serde_json::json!({ "duties": instance.duties }))?;
    write_json(
        out,
        "preferences.json",
        &serde_json::json!({ "off_requests": instance.off_requests }),
    )?;
    Ok(())
}

fn build(rng: &mut StdRng, captains: usize, days: u32, duties_per_day: usize) -> Instance {
    let captains = captains.max(1);
    let days = days.max(1);
    let duties_per_day = duties_per_day.clamp(1, 26);

    let scenario = Scenario {
        horizon_days: days,
        min_rest_minutes: 660,
        max_consecutive_work_days: 5,
        min_rest_days_per_week: 1,
        late_end_threshold_min: 1200,
        early_start_threshold_min: 480,
        weights: Weights {
            fairness_spread: 1,
            worked_days: 1,
            off_request: 1,
            weekly_rest_shortfall: 5,
            late_to_early: 5,
        },
    };

    let mut crew = Vec::new();
    for i in 1..=captains {
        crew.push(member(format!("CAPT{i}"), Role::Capt, days));
    }
    for i in 1..=captains {
        crew.push(member(format!("FO{i}"), Role::Fo, days));
    }
    for i in 1..=(2 * captains) {
        crew.push(member(format!("FA{i}"), Role::Fa, days));
    }

    let mut duties = Vec::new();
    for day in 1..=days {
        for k in 0..duties_per_day {
            // departures between 06:00 and 15:00, blocks of 4-7 hours
            let start_min = 360 + 30 * rng.random_range(0..=18);
            let end_min = start_min + 30 * rng.random_range(8..=14);
            duties.push(Duty {
                duty_id: format!("D{day:02}{}", (b'A' + k as u8) as char),
                day,
                start_min,
                end_min,
                base: "CDG".into(),
                aircraft_type: "A320".into(),
                coverage: [(Role::Capt, 1), (Role::Fo, 1), (Role::Fa, 2)]
                    .into_iter()
                    .collect(),
            });
        }
    }

    let mut off_requests = Vec::new();
    for c in &crew {
        if rng.random_bool(0.25) {
            off_requests.push(OffRequest {
                crew_id: c.crew_id.clone(),
                day: rng.random_range(1..=days),
                penalty: rng.random_range(5..=20),
            });
        }
    }

    Instance {
        scenario,
        crew,
        duties,
        off_requests,
    }
}

fn member(crew_id: String, role: Role, days: u32) -> CrewMember {
    CrewMember {
        crew_id,
        role,
        base: "CDG".into(),
        qualified_types: vec!["A320".into()],
        max_minutes: i64::from(days) * 600,
    }
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> Result<()> {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value)?)?;
    Ok(())
}
