//! Equality-constrained resolution with an explicit objective.
//!
//! The magnitudes minimise an [`Objective`] subject to
//!
//! ```text
//! Σ xᵢ        = 0
//! Σ xᵢ · pᵢ   = M
//! ```
//!
//! using sequential quadratic programming started from the zero vector. Each
//! iteration solves the local quadratic model by the null-space method: a
//! minimum-norm correction onto the constraints plus the objective step
//! projected into the null space of the constraint matrix
//! (<https://en.wikipedia.org/wiki/Sequential_quadratic_programming>).
//! Polarity plays no part in this mode.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::errors::{ObjectiveError, SolveError};
use crate::problem::EquilibriumProblem;
use crate::solution::EquilibriumSolution;
use crate::solver::SolverOptions;
use crate::system::{min_norm_solve, resolve_forces, BalanceSystem};

/// Relative singular value cutoff for the constraint matrix.
///
/// Coincident force positions make the constraint rows parallel; the
/// corresponding direction is dropped instead of amplified. Positions a
/// fraction of a micrometre apart stay well above it.
const CONSTRAINT_RCOND: f64 = 1.0e-12;

/// Preference used to pick one point of the feasible set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// No preference; any point meeting both constraints is accepted.
    #[default]
    Feasibility,
    /// Minimise `½ Σ xᵢ²`.
    MinimumNorm,
    /// Minimise `½ Σ wᵢ xᵢ²` with strictly positive weights.
    Weighted {
        /// One weight per force, in problem order.
        weights: Vec<f64>,
    },
}

impl Objective {
    /// Check the objective against a problem with `forces` unknowns.
    pub fn validate(&self, forces: usize) -> Result<(), ObjectiveError> {
        let Self::Weighted { weights } = self else {
            return Ok(());
        };
        if weights.len() != forces {
            return Err(ObjectiveError::WeightCount {
                expected: forces,
                received: weights.len(),
            });
        }
        for (index, &weight) in weights.iter().enumerate() {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ObjectiveError::NonPositiveWeight { index, weight });
            }
        }
        Ok(())
    }

    /// Objective value at `x`.
    #[must_use]
    pub fn value(&self, x: &DVector<f64>) -> f64 {
        match self {
            Self::Feasibility => 0.0,
            Self::MinimumNorm => 0.5 * x.norm_squared(),
            Self::Weighted { weights } => {
                0.5 * x
                    .iter()
                    .zip(weights)
                    .map(|(xi, wi)| wi * xi * xi)
                    .sum::<f64>()
            }
        }
    }

    /// Gradient of the objective at `x`.
    #[must_use]
    pub fn gradient(&self, x: &DVector<f64>) -> DVector<f64> {
        match self {
            Self::Feasibility => DVector::zeros(x.len()),
            Self::MinimumNorm => x.clone(),
            Self::Weighted { weights } => x.component_mul(&DVector::from_column_slice(weights)),
        }
    }

    /// Diagonal of the Hessian model used in the quadratic subproblem.
    ///
    /// The feasibility objective has a zero Hessian; the identity stands in
    /// for it, so each step is the shortest correction onto the constraints.
    #[must_use]
    pub fn hessian_diagonal(&self, n: usize) -> DVector<f64> {
        match self {
            Self::Feasibility | Self::MinimumNorm => DVector::from_element(n, 1.0),
            Self::Weighted { weights } => DVector::from_column_slice(weights),
        }
    }
}

/// Resolve the magnitudes by constrained optimisation.
///
/// Returns [`SolveStatus::Infeasible`](crate::SolveStatus::Infeasible) when
/// the final iterate still violates a constraint by more than
/// [`SolverOptions::feasibility_tolerance`] (scaled by the size of the
/// problem data). No magnitudes are reported in that case.
///
/// # Examples
/// ```
/// use equilibrix::{solve_constrained, EquilibriumProblem, Objective, SolverOptions};
///
/// let mut problem = EquilibriumProblem::new(5.0);
/// problem.add_force(3.0);
/// problem.add_force(3.0);
/// let solution = solve_constrained(&problem, &Objective::Feasibility, &SolverOptions::default())
///     .expect("valid problem");
/// assert!(!solution.is_solved());
/// assert!(solution.magnitudes().is_none());
/// ```
pub fn solve_constrained(
    problem: &EquilibriumProblem,
    objective: &Objective,
    options: &SolverOptions,
) -> Result<EquilibriumSolution, SolveError> {
    problem.validate()?;
    options.validate()?;
    let system = BalanceSystem::unsigned(problem);
    let n = system.unknowns();
    objective.validate(n)?;
    tracing::debug!(forces = n, ?objective, "constrained solve");

    // With the diagonal Hessian D, substitute p = D^(-1/2) q so the
    // subproblem becomes: minimise ½‖q + h‖² subject to Ã q = -r, where
    // Ã = A D^(-1/2) and h = D^(-1/2) ∇J. Its solution is
    // q = Ã⁺(Ã h - r) - h, which only needs the 2×N matrix Ã.
    let inv_sqrt = objective.hessian_diagonal(n).map(|d| d.sqrt().recip());
    let mut scaled = system.matrix.clone();
    for (mut column, &factor) in scaled.column_iter_mut().zip(inv_sqrt.iter()) {
        column *= factor;
    }

    let mut x = DVector::zeros(n);
    let mut iterations = 0;
    let mut converged = false;
    let mut previous_step = f64::INFINITY;
    while iterations < options.max_iterations {
        iterations += 1;
        let h = objective.gradient(&x).component_mul(&inv_sqrt);
        let target = &scaled * &h - system.residual(&x);
        let q = min_norm_solve(&scaled, &target, CONSTRAINT_RCOND)? - &h;
        let step = q.component_mul(&inv_sqrt);
        x += &step;

        let step_size = step.amax();
        tracing::trace!(
            iteration = iterations,
            step_size,
            violation = system.violation(&x),
            objective = objective.value(&x),
            "sqp iteration"
        );
        if step_size <= options.step_tolerance * (1.0 + x.amax()) {
            converged = true;
            break;
        }
        // Steps that stop shrinking are rounding noise of an ill-conditioned
        // constraint matrix, not progress.
        if step_size >= previous_step {
            tracing::debug!(iteration = iterations, step_size, "step size stalled");
            converged = true;
            break;
        }
        previous_step = step_size;
    }

    let violation = system.violation(&x);
    let scale = 1.0 + system.rhs.amax().max(system.matrix.amax() * x.amax());
    if !converged {
        tracing::warn!(iterations, violation, "constrained solve hit the iteration limit");
    }
    if violation > options.feasibility_tolerance * scale {
        tracing::warn!(violation, "no magnitudes satisfy both equilibrium constraints");
        return Ok(EquilibriumSolution::infeasible(violation, iterations));
    }

    let check = system.check(&x);
    tracing::debug!(
        sum_force = check.sum_force,
        sum_moment = check.sum_moment,
        deviation = check.moment_deviation,
        "constrained solve converged"
    );
    Ok(EquilibriumSolution::solved(
        resolve_forces(problem, &x),
        check,
        iterations,
    ))
}
