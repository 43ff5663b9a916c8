//! Error types produced while describing or solving an equilibrium problem.

use thiserror::Error;

/// Error returned when a solve cannot be attempted or the linear algebra
/// backing it breaks down.
///
/// Infeasibility of the constrained mode is not an error; it is reported
/// through [`SolveStatus::Infeasible`](crate::SolveStatus::Infeasible) so
/// callers never mistake a missing answer for a zero one.
///
/// # Examples
///
/// ```
/// use equilibrix::{EquilibriumProblem, EquilibriumSolver, SolveError};
///
/// let problem = EquilibriumProblem::new(10.0);
/// let error = EquilibriumSolver::default()
///     .solve(&problem)
///     .expect_err("a problem without forces is rejected");
/// assert_eq!(error, SolveError::EmptyProblem);
/// assert!(error.is_invalid_input());
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolveError {
    /// Returned when the problem holds no forces at all.
    #[error("an equilibrium problem needs at least one force")]
    EmptyProblem,
    /// Returned when a force position is NaN or infinite.
    #[error("force {index} has a non-finite position ({position})")]
    NonFinitePosition {
        /// Index of the offending force in the problem.
        index: usize,
        /// Rejected position in metres.
        position: f64,
    },
    /// Returned when the target moment is NaN or infinite.
    #[error("target moment must be finite (received {0})")]
    NonFiniteMoment(f64),
    /// Returned when two forces share a display name.
    #[error("force name {0:?} is used more than once")]
    DuplicateName(String),
    /// Returned when the objective of the constrained mode does not fit the problem.
    #[error("{0}")]
    InvalidObjective(#[from] ObjectiveError),
    /// Returned when a solver tolerance or limit is not usable.
    #[error("solver option {option} must be {requirement} (received {value})")]
    InvalidOptions {
        /// Name of the offending option.
        option: &'static str,
        /// Condition the option has to meet.
        requirement: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the singular value decomposition cannot produce a solution.
    #[error("linear solve failed: {0}")]
    Decomposition(&'static str),
}

impl SolveError {
    /// Whether the error stems from the caller's input rather than the numerics.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::Decomposition(_))
    }
}

/// Error returned when an [`Objective`](crate::Objective) is malformed.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ObjectiveError {
    /// Returned when the weight vector length differs from the force count.
    #[error("expected {expected} weights, received {received}")]
    WeightCount {
        /// Number of forces in the problem.
        expected: usize,
        /// Number of weights supplied.
        received: usize,
    },
    /// Returned when a weight is zero, negative or not finite.
    #[error("weight {index} must be finite and positive (received {weight})")]
    NonPositiveWeight {
        /// Index of the offending weight.
        index: usize,
        /// Rejected weight.
        weight: f64,
    },
}
