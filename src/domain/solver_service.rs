// Domain service interface for solving optimization problems
// Defines the contract that any solver implementation must follow

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// This trait defines the contract that all solver implementations must
/// follow, so backends can be swapped without touching the model-building
/// or extraction logic.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = problem.num_variables();

        if num_vars == 0 {
            errors.push("Problem declares no variables".to_string());
        }

        for &(id, _) in &problem.objective.terms {
            if id >= num_vars {
                errors.push(format!(
                    "Objective references unknown variable id {} ({} declared)",
                    id, num_vars
                ));
            }
        }

        for constraint in &problem.constraints {
            for &(id, _) in &constraint.terms {
                if id >= num_vars {
                    errors.push(format!(
                        "Constraint '{}' references unknown variable id {} ({} declared)",
                        constraint.name, id, num_vars
                    ));
                }
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
