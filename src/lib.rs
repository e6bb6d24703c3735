// Domain layer: Business types and rules
pub mod domain;

// Application layer: The assignment pipeline stages
pub mod application;

// Solver adapters: Concrete implementations of SolverService
#[cfg(feature = "solver")]
pub mod solver;

// Re-export commonly used types
pub use domain::{
    AssignmentPolicy, Band, Cohort, Constraint, ConstraintType, GroupAssignment, GroupRoster,
    ObjectiveFunction, OptimizationProblem, OptimizationType, RawStudentRecord, Solution,
    SolutionStatus, SolverError, SolverService, Student, Variable, VariableType,
};

pub use application::{
    assign_groups, extract, formulate, preprocess, screen_balance, ExtractError, Formulation,
    PipelineError, PreconditionError, PreprocessError, VariableCatalog, ASSIGNMENT_THRESHOLD,
    VALUE_EPSILON,
};

#[cfg(feature = "solver")]
pub use solver::MicrolpSolver;
