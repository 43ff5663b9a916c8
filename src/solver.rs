//! Solver configuration and the entry point that dispatches on it.

use serde::{Deserialize, Serialize};

use crate::constrained::{solve_constrained, Objective};
use crate::errors::SolveError;
use crate::least_squares::solve_least_squares;
use crate::problem::EquilibriumProblem;
use crate::solution::EquilibriumSolution;

/// Strategy used to pick magnitudes out of the underdetermined balance equations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SolveMode {
    /// Minimum-norm least-squares solve honouring each force's polarity.
    #[default]
    LeastSquares,
    /// Sequential quadratic programming with an explicit objective.
    Constrained {
        /// Preference among the feasible magnitudes.
        #[serde(default)]
        objective: Objective,
    },
}

/// Numerical knobs of the constrained mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Largest accepted constraint violation, relative to the problem scale.
    pub feasibility_tolerance: f64,
    /// Iteration stops once a step is this small relative to the iterate.
    pub step_tolerance: f64,
    /// Upper bound on the number of quadratic subproblems solved.
    pub max_iterations: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            feasibility_tolerance: 1.0e-8,
            step_tolerance: 1.0e-12,
            max_iterations: 100,
        }
    }
}

impl SolverOptions {
    /// Check that the tolerances are finite and non-negative and that at
    /// least one iteration is allowed.
    pub fn validate(&self) -> Result<(), SolveError> {
        let tolerances = [
            ("feasibility_tolerance", self.feasibility_tolerance),
            ("step_tolerance", self.step_tolerance),
        ];
        for (option, value) in tolerances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SolveError::InvalidOptions {
                    option,
                    requirement: "finite and non-negative",
                    value,
                });
            }
        }
        if self.max_iterations == 0 {
            return Err(SolveError::InvalidOptions {
                option: "max_iterations",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Stateless solver for [`EquilibriumProblem`]s.
///
/// # Examples
/// ```
/// use equilibrix::{EquilibriumProblem, EquilibriumSolver, Objective, SolveMode};
///
/// let mut problem = EquilibriumProblem::new(20.0);
/// problem.add_force(0.0);
/// problem.add_force(5.0);
///
/// let solver = EquilibriumSolver::new(SolveMode::Constrained {
///     objective: Objective::Feasibility,
/// });
/// let solution = solver.solve(&problem).expect("valid problem");
/// let check = solution.check().expect("solved");
/// assert!(check.moment_deviation < 1.0e-8);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSolver {
    /// Resolution strategy.
    #[serde(flatten)]
    pub mode: SolveMode,
    /// Tolerances and limits.
    #[serde(default)]
    pub options: SolverOptions,
}

impl EquilibriumSolver {
    /// Create a solver with default options.
    #[must_use]
    pub fn new(mode: SolveMode) -> Self {
        Self {
            mode,
            options: SolverOptions::default(),
        }
    }

    /// Replace the solver options.
    #[must_use]
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the force magnitudes of `problem`.
    ///
    /// Invalid input is rejected before any numeric work. The problem is only
    /// read, never modified.
    pub fn solve(&self, problem: &EquilibriumProblem) -> Result<EquilibriumSolution, SolveError> {
        match &self.mode {
            SolveMode::LeastSquares => solve_least_squares(problem),
            SolveMode::Constrained { objective } => {
                solve_constrained(problem, objective, &self.options)
            }
        }
    }
}

/// A problem bundled with the solver that should resolve it.
///
/// This is the document a host application exchanges as JSON:
///
/// ```json
/// {
///   "problem": {
///     "forces": [{ "name": "F1", "position": 0.0 }, { "name": "F2", "position": 5.0 }],
///     "target_moment": 20.0
///   },
///   "solver": { "mode": "constrained", "objective": { "kind": "feasibility" } }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Forces and target moment.
    pub problem: EquilibriumProblem,
    /// Solver configuration; least squares when omitted.
    #[serde(default)]
    pub solver: EquilibriumSolver,
}

impl SolveRequest {
    /// Solve the bundled problem with the bundled solver.
    pub fn solve(&self) -> Result<EquilibriumSolution, SolveError> {
        self.solver.solve(&self.problem)
    }
}
