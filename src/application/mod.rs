// Application module: the stages of the group-assignment pipeline

pub mod extract;
pub mod formulation;
pub mod pipeline;
pub mod preprocess;

pub use extract::{extract, ExtractError, ASSIGNMENT_THRESHOLD, VALUE_EPSILON};
pub use formulation::{formulate, Formulation, VariableCatalog};
pub use pipeline::{assign_groups, screen_balance, PipelineError, PreconditionError};
pub use preprocess::{preprocess, PreprocessError};
