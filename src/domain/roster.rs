// Roster types: the group breakdown a grouping run produces

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cohort::Cohort;
use super::policy::AssignmentPolicy;

/// Composition of one assembled group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRoster {
    pub group_label: String,
    /// Member ids, sorted.
    pub members: Vec<String>,
    pub female_count: u32,
    pub quant_count: u32,
    /// Member count per nationality label, home students included.
    pub nationality_histogram: BTreeMap<String, u32>,
    /// Member count per culture label, home students included.
    pub culture_histogram: BTreeMap<String, u32>,
}

/// The complete outcome of a grouping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub rosters: Vec<GroupRoster>,
    /// Objective value reported by the solver.
    pub objective_value: f64,
}

impl GroupAssignment {
    /// Recomputes the affinity objective from the rosters themselves.
    ///
    /// Each group contributes half the international member count of every
    /// represented nationality and culture label, scaled by the policy
    /// weights. Matches the score the optimizer maximizes, so a divergence
    /// from `objective_value` indicates a malformed extraction.
    pub fn affinity_score(&self, cohort: &Cohort, policy: &AssignmentPolicy) -> f64 {
        let mut score = 0.0;
        for roster in &self.rosters {
            let mut nationality_counts: BTreeMap<&str, u32> = BTreeMap::new();
            let mut culture_counts: BTreeMap<&str, u32> = BTreeMap::new();
            for id in &roster.members {
                if let Some(student) = cohort.get(id) {
                    if student.international {
                        *nationality_counts.entry(&student.nationality).or_insert(0) += 1;
                        *culture_counts.entry(&student.culture).or_insert(0) += 1;
                    }
                }
            }
            for count in nationality_counts.values() {
                score += policy.nationality_weight * 0.5 * f64::from(*count);
            }
            for count in culture_counts.values() {
                score += policy.culture_weight * 0.5 * f64::from(*count);
            }
        }
        score
    }
}
