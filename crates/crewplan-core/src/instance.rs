//! Instance-directory loading.
//!
//! An instance directory holds `scenario.json`, `crew.json`,
//! `duties.json` and an optional `preferences.json`, each wrapping its
//! record list in a top-level object (`{"crew": [...]}` etc.).

use std::path::Path;

use serde::Deserialize;

use crate::domain::{CrewMember, Duty, Instance, OffRequest, Scenario};
use crate::error::{Result, RosterError};

#[derive(Deserialize)]
struct CrewFile {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Deserialize)]
struct DutiesFile {
    #[serde(default)]
    duties: Vec<Duty>,
}

#[derive(Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    off_requests: Vec<OffRequest>,
}

/// Loads one instance directory. `preferences.json` is optional; the
/// other three files must exist.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Instance> {
    let dir = dir.as_ref();

    let scenario: Scenario = read_json(&dir.join("scenario.json"))?;
    let crew: CrewFile = read_json(&dir.join("crew.json"))?;
    let duties: DutiesFile = read_json(&dir.join("duties.json"))?;

    let prefs_path = dir.join("preferences.json");
    let off_requests = if prefs_path.exists() {
        read_json::<PreferencesFile>(&prefs_path)?.off_requests
    } else {
        Vec::new()
    };

    Ok(Instance {
        scenario,
        crew: crew.crew,
        duties: duties.duties,
        off_requests,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(RosterError::InvalidInstance(format!(
            "missing input file: {}",
            path.display()
        )));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_load_full_instance_dir() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "scenario.json",
            r#"{
                "horizon_days": 7,
                "min_rest_minutes": 660,
                "max_consecutive_work_days": 5,
                "min_rest_days_per_week": 2,
                "weights": {"fairness_spread": 1, "worked_days": 10}
            }"#,
        );
        write(
            tmp.path(),
            "crew.json",
            r#"{"crew": [{
                "crew_id": "C1", "role": "CAPT", "base": "CDG",
                "qualified_types": ["A320"], "max_minutes": 6000
            }]}"#,
        );
        write(
            tmp.path(),
            "duties.json",
            r#"{"duties": [{
                "duty_id": "D1", "day": 1, "start_min": 480, "end_min": 960,
                "base": "CDG", "aircraft_type": "A320",
                "coverage": {"CAPT": 1}
            }]}"#,
        );
        write(
            tmp.path(),
            "preferences.json",
            r#"{"off_requests": [{"crew_id": "C1", "day": 2, "penalty": 8}]}"#,
        );

        let inst = load_dir(tmp.path()).unwrap();
        assert_eq!(inst.crew.len(), 1);
        assert_eq!(inst.duties.len(), 1);
        assert_eq!(inst.off_requests.len(), 1);
        assert_eq!(inst.scenario.weights.worked_days, 10);
        assert_eq!(inst.scenario.weights.off_request, 0);
        assert_eq!(inst.scenario.late_end_threshold_min, 1200);
    }

    #[test]
    fn test_missing_preferences_file_is_empty_requests() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "scenario.json",
            r#"{"horizon_days": 7, "min_rest_minutes": 660, "max_consecutive_work_days": 5}"#,
        );
        write(tmp.path(), "crew.json", r#"{"crew": []}"#);
        write(tmp.path(), "duties.json", r#"{"duties": []}"#);

        let inst = load_dir(tmp.path()).unwrap();
        assert!(inst.off_requests.is_empty());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "scenario.json",
            r#"{"horizon_days": 7, "min_rest_minutes": 660, "max_consecutive_work_days": 5}"#,
        );
        let err = load_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, RosterError::InvalidInstance(_)));
    }
}
