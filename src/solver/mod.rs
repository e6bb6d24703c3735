// Solver module: backends implementing the domain solver contract

pub mod microlp_solver;

pub use microlp_solver::MicrolpSolver;
