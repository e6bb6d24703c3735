use super::value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType};

/// Index of a variable in its problem's registry.
///
/// Ids are handed out by [`OptimizationProblem::add_variable`] in declaration
/// order; constraint and objective terms, as well as returned solution
/// values, are keyed by them.
pub type VarId = usize;

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn is_binary(&self) -> bool {
        self.variable_type == VariableType::Binary
    }
}

/// Objective function as sparse terms over registry variables
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub terms: Vec<(VarId, f64)>,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType) -> Self {
        Self {
            optimization_type,
            terms: Vec::new(),
        }
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }
}

/// Linear constraint as sparse terms over registry variables
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(VarId, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(VarId, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub description: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
}

impl OptimizationProblem {
    pub fn new(name: impl Into<String>, optimization_type: OptimizationType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            objective: ObjectiveFunction::new(optimization_type),
            constraints: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Registers a variable and returns its id for use in terms.
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn add_objective_term(&mut self, var: VarId, coefficient: f64) {
        self.objective.add_term(var, coefficient);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_binary()).count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_binary_variables() > 0
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_binary_vars: u32,
}

/// Solution to an optimization problem
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Value assigned to a registry variable, if the solution carries one.
    pub fn value(&self, var: VarId) -> Option<f64> {
        self.variable_values.get(var).copied()
    }
}
