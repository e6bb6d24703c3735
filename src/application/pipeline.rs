// Assignment pipeline: raw records in, validated group rosters out

use crate::domain::{
    AssignmentPolicy, Band, Cohort, GroupAssignment, RawStudentRecord, SolverError, SolverService,
};

use super::extract::{extract, ExtractError, VALUE_EPSILON};
use super::formulation::formulate;
use super::preprocess::{preprocess, PreprocessError};

/// Cohort-level balance checks that fail before any model is built.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PreconditionError {
    #[error("cohort has {total} female students but {groups} groups require between {min} and {max}")]
    FemaleCountInfeasible {
        total: u32,
        groups: usize,
        min: u32,
        max: u32,
    },

    #[error("cohort has {total} quantitative students but {groups} groups require between {min} and {max}")]
    QuantCountInfeasible {
        total: u32,
        groups: usize,
        min: u32,
        max: u32,
    },
}

/// Any failure along the assignment pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Checks that cohort-wide totals fit the per-group bands at all.
///
/// A cohort with one female student cannot fill two groups that each need
/// two, no matter how students are arranged; such cohorts fail here with the
/// exact shortfall rather than as a bare solver infeasibility verdict.
pub fn screen_balance(
    cohort: &Cohort,
    policy: &AssignmentPolicy,
) -> Result<(), PreconditionError> {
    let groups = cohort.len() / policy.group_capacity;
    let groups_u32 = groups as u32;

    let female_total = cohort.female_total();
    let female_bounds = Band::new(
        policy.female_band.min * groups_u32,
        policy.female_band.max * groups_u32,
    );
    if !female_bounds.contains(female_total) {
        return Err(PreconditionError::FemaleCountInfeasible {
            total: female_total,
            groups,
            min: female_bounds.min,
            max: female_bounds.max,
        });
    }

    let quant_total = cohort.quant_total();
    let quant_bounds = Band::new(
        policy.quant_band.min * groups_u32,
        policy.quant_band.max * groups_u32,
    );
    if !quant_bounds.contains(quant_total) {
        return Err(PreconditionError::QuantCountInfeasible {
            total: quant_total,
            groups,
            min: quant_bounds.min,
            max: quant_bounds.max,
        });
    }

    Ok(())
}

/// Runs the full assignment pipeline on a raw roster.
///
/// Records are validated, the cohort is screened against the policy bands,
/// the grouping model is built and solved, and the rosters are read back out
/// of the solution. The extracted assignment's affinity score is reconciled
/// against the solver's objective as a cross-check on the extraction.
pub fn assign_groups(
    records: &[RawStudentRecord],
    policy: &AssignmentPolicy,
    solver: &dyn SolverService,
) -> Result<GroupAssignment, PipelineError> {
    let cohort = preprocess(records, policy)?;
    log::info!(
        "preprocessed {} students ({} female, {} quantitative)",
        cohort.len(),
        cohort.female_total(),
        cohort.quant_total()
    );

    screen_balance(&cohort, policy)?;

    let formulation = formulate(&cohort, policy);
    if formulation.problem.is_mixed_integer() && !solver.supports_mip() {
        return Err(SolverError::InvalidProblem(format!(
            "solver '{}' does not support mixed-integer problems",
            solver.name()
        ))
        .into());
    }

    log::info!(
        "solving '{}' with {}",
        formulation.problem.name,
        solver.name()
    );
    let solution = solver.solve(&formulation.problem)?;
    log::info!("solver finished: {}", solution.status);

    let assignment = extract(&formulation, &solution, &cohort)?;

    let recomputed = assignment.affinity_score(&cohort, policy);
    if (recomputed - assignment.objective_value).abs() > VALUE_EPSILON {
        log::warn!(
            "solver objective {} diverges from recomputed affinity score {}",
            assignment.objective_value,
            recomputed
        );
    }
    log::debug!(
        "assignment complete: {} groups, objective {}",
        assignment.rosters.len(),
        assignment.objective_value
    );

    Ok(assignment)
}
