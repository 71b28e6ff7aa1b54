//! Eligibility analysis: which (crew, duty) pairs are legal.
//!
//! Ineligible pairs never become decision variables, so ineligibility is
//! a structural hard constraint rather than a penalized one.

use std::collections::HashSet;

use crate::domain::{CrewMember, Duty, Instance};

/// Returns true iff `crew` may legally be assigned to `duty`: the crew
/// role is part of the duty's required coverage, the bases match, and
/// the crew member is qualified on the duty's aircraft type.
pub fn is_eligible(crew: &CrewMember, duty: &Duty) -> bool {
    duty.coverage.contains_key(&crew.role)
        && crew.base == duty.base
        && crew.qualified_types.iter().any(|t| *t == duty.aircraft_type)
}

/// Precomputed eligibility relation keyed by (crew index, duty index).
#[derive(Debug, Clone)]
pub struct Eligibility {
    pairs: HashSet<(usize, usize)>,
}

impl Eligibility {
    /// Computes the full relation for an instance.
    pub fn compute(instance: &Instance) -> Self {
        let mut pairs = HashSet::new();
        for (ci, c) in instance.crew.iter().enumerate() {
            for (di, d) in instance.duties.iter().enumerate() {
                if is_eligible(c, d) {
                    pairs.insert((ci, di));
                }
            }
        }
        Eligibility { pairs }
    }

    pub fn is_eligible(&self, crew: usize, duty: usize) -> bool {
        self.pairs.contains(&(crew, duty))
    }

    /// Number of eligible pairs, i.e. the number of assignment variables
    /// the model will declare.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
