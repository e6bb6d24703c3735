// Domain module: business types and the solver contract

pub mod cohort;
pub mod models;
pub mod policy;
pub mod roster;
pub mod solver_service;
pub mod value_objects;

pub use cohort::{Cohort, RawStudentRecord, Student};
pub use models::{
    Constraint, ObjectiveFunction, OptimizationProblem, Solution, SolverStatistics, VarId,
    Variable,
};
pub use policy::{AssignmentPolicy, Band};
pub use roster::{GroupAssignment, GroupRoster};
pub use solver_service::{SolverError, SolverService};
pub use value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType};
