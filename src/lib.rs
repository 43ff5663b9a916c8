#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod constrained;
mod errors;
mod least_squares;
mod problem;
mod solution;
mod solver;
mod system;

pub use constrained::{solve_constrained, Objective};
pub use errors::{ObjectiveError, SolveError};
pub use least_squares::solve_least_squares;
pub use problem::{EquilibriumProblem, ForceSpec, Polarity};
pub use solution::{EquilibriumCheck, EquilibriumSolution, ResolvedForce, SolveStatus};
pub use solver::{EquilibriumSolver, SolveMode, SolveRequest, SolverOptions};
