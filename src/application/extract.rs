// Result extraction: reads group rosters back out of a solved model

use std::collections::BTreeMap;

use crate::domain::{Cohort, GroupAssignment, GroupRoster, Solution, SolutionStatus};

use super::formulation::Formulation;

/// A placement variable above this value counts as a membership.
pub const ASSIGNMENT_THRESHOLD: f64 = 0.5;

/// Tolerance for comparing solver-reported and recomputed scores.
pub const VALUE_EPSILON: f64 = 1e-6;

/// Errors raised while reading rosters out of a solution.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExtractError {
    #[error("solution is not optimal: {0}")]
    NotOptimal(SolutionStatus),

    #[error("optimal solution carries no objective value")]
    MissingObjective,

    #[error("solution carries no value for variable '{name}'")]
    MissingValue { name: String },

    #[error("student '{id}' was placed in no group")]
    Unassigned { id: String },

    #[error("student '{id}' was placed in {count} groups")]
    AmbiguousAssignment { id: String, count: usize },
}

/// Turns an optimal solution into per-group rosters.
///
/// Each student must have exactly one placement variable above the
/// threshold; anything else indicates a malformed solution and is rejected.
/// Roster histograms cover every member, home students included.
pub fn extract(
    formulation: &Formulation,
    solution: &Solution,
    cohort: &Cohort,
) -> Result<GroupAssignment, ExtractError> {
    if !solution.is_optimal() {
        return Err(ExtractError::NotOptimal(solution.status));
    }
    let objective_value = solution
        .objective_value
        .ok_or(ExtractError::MissingObjective)?;

    let num_groups = formulation.groups.len();
    let mut membership: Vec<Vec<usize>> = vec![Vec::new(); num_groups];
    for (s, student) in cohort.students().iter().enumerate() {
        let mut hits = 0;
        let mut chosen = None;
        for (g, &var) in formulation.catalog.assignment[s].iter().enumerate() {
            let value = solution.value(var).ok_or_else(|| ExtractError::MissingValue {
                name: formulation.problem.variables[var].name.clone(),
            })?;
            if value > ASSIGNMENT_THRESHOLD {
                hits += 1;
                chosen = Some(g);
            }
        }
        match (hits, chosen) {
            (1, Some(g)) => membership[g].push(s),
            (0, _) => {
                return Err(ExtractError::Unassigned {
                    id: student.id.clone(),
                })
            }
            (count, _) => {
                return Err(ExtractError::AmbiguousAssignment {
                    id: student.id.clone(),
                    count,
                })
            }
        }
    }

    let mut rosters = Vec::with_capacity(num_groups);
    for (g, group_label) in formulation.groups.iter().enumerate() {
        let mut members = Vec::with_capacity(membership[g].len());
        let mut female_count = 0;
        let mut quant_count = 0;
        let mut nationality_histogram: BTreeMap<String, u32> = BTreeMap::new();
        let mut culture_histogram: BTreeMap<String, u32> = BTreeMap::new();
        for &s in &membership[g] {
            let student = &cohort.students()[s];
            members.push(student.id.clone());
            if student.female {
                female_count += 1;
            }
            if student.quant {
                quant_count += 1;
            }
            *nationality_histogram
                .entry(student.nationality.clone())
                .or_insert(0) += 1;
            *culture_histogram.entry(student.culture.clone()).or_insert(0) += 1;
        }
        members.sort();
        rosters.push(GroupRoster {
            group_label: group_label.clone(),
            members,
            female_count,
            quant_count,
            nationality_histogram,
            culture_histogram,
        });
    }

    Ok(GroupAssignment {
        rosters,
        objective_value,
    })
}
