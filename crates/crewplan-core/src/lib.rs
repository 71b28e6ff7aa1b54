//! Crewplan Core - Instance model and preprocessing for crew rostering
//!
//! This crate provides the problem-side half of crewplan:
//! - Domain types for crew, duties, scenario rules and off-requests
//! - Fail-fast instance validation
//! - Eligibility and duty-conflict analysis
//! - Advisory coverage feasibility checking
//! - Instance-directory loading

pub mod conflicts;
pub mod coverage;
pub mod domain;
pub mod eligibility;
pub mod error;
pub mod instance;
pub mod validate;

pub use conflicts::{conflict_pairs, duties_conflict};
pub use coverage::{check_coverage, CoverageIssue};
pub use domain::{CrewMember, Duty, Instance, OffRequest, Role, Scenario, Weights};
pub use eligibility::{is_eligible, Eligibility};
pub use error::{Result, RosterError};
pub use instance::load_dir;
pub use validate::validate_instance;
