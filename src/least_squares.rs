//! Minimum-norm least-squares resolution of the balance equations.
//!
//! With more than two forces the balance equations are underdetermined and
//! the answer with the smallest Euclidean norm is returned. With two
//! independent forces the answer is exact, and a single force receives the
//! best fit of the two equations. See
//! <https://en.wikipedia.org/wiki/Moore%E2%80%93Penrose_inverse>.

use crate::errors::SolveError;
use crate::problem::EquilibriumProblem;
use crate::solution::EquilibriumSolution;
use crate::system::{machine_rcond, min_norm_solve, resolve_forces, BalanceSystem};

/// Resolve the magnitudes with a minimum-norm least-squares solve.
///
/// The coefficients of each force are scaled by its polarity. The result is
/// always [`SolveStatus::Solved`](crate::SolveStatus::Solved); check
/// [`EquilibriumCheck::residual_norm`](crate::EquilibriumCheck::residual_norm)
/// to see whether both equations could be met.
///
/// # Examples
/// ```
/// use equilibrix::{solve_least_squares, EquilibriumProblem};
///
/// let mut problem = EquilibriumProblem::new(20.0);
/// problem.add_force(0.0);
/// problem.add_force(5.0);
/// let solution = solve_least_squares(&problem).expect("valid problem");
/// let magnitudes = solution.magnitudes().expect("always solved");
/// assert!((magnitudes[0] + 4.0).abs() < 1.0e-9);
/// assert!((magnitudes[1] - 4.0).abs() < 1.0e-9);
/// ```
pub fn solve_least_squares(
    problem: &EquilibriumProblem,
) -> Result<EquilibriumSolution, SolveError> {
    problem.validate()?;
    let system = BalanceSystem::with_polarity(problem);
    tracing::debug!(forces = system.unknowns(), "least-squares solve");

    let x = min_norm_solve(&system.matrix, &system.rhs, machine_rcond(&system.matrix))?;
    let check = system.check(&x);
    if check.residual_norm > 1.0e-9 {
        tracing::debug!(
            residual = check.residual_norm,
            "balance equations are inconsistent, returning best fit"
        );
    }
    Ok(EquilibriumSolution::solved(
        resolve_forces(problem, &x),
        check,
        1,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ForceSpec, Polarity};
    use approx::assert_abs_diff_eq;

    #[test]
    fn three_forces_satisfy_both_equations() {
        let mut problem = EquilibriumProblem::new(10.0);
        for position in [0.0, 2.0, 4.0] {
            problem.add_force(position);
        }
        let solution = solve_least_squares(&problem).expect("solves");
        let x = solution.magnitudes().expect("solved");

        // Closed form: x = A^T (A A^T)^-1 b with A = [[1,1,1],[0,2,4]].
        assert_abs_diff_eq!(x[0], -2.5, epsilon = 1.0e-9);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(x[2], 2.5, epsilon = 1.0e-9);
    }

    #[test]
    fn negative_polarity_flips_the_magnitude() {
        let problem = EquilibriumProblem::from_forces(
            vec![
                ForceSpec::new("A", 0.0),
                ForceSpec::new("B", 5.0).with_polarity(Polarity::Negative),
            ],
            20.0,
        );
        let x = solve_least_squares(&problem)
            .expect("solves")
            .magnitudes()
            .expect("solved");
        assert_abs_diff_eq!(x[0], -4.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(x[1], -4.0, epsilon = 1.0e-9);
    }

    #[test]
    fn far_apart_forces_keep_force_balance() {
        let mut problem = EquilibriumProblem::new(1.0e6);
        problem.add_force(0.0);
        problem.add_force(1.0e6);
        let solution = solve_least_squares(&problem).expect("solves");
        let x = solution.magnitudes().expect("solved");
        assert_abs_diff_eq!(x[0], -1.0, epsilon = 1.0e-9);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1.0e-9);

        let check = solution.check().expect("check present");
        assert!(check.sum_force.abs() < 1.0e-6);
        assert!(check.moment_deviation < 1.0e-6);
    }

    #[test]
    fn single_force_gets_best_fit() {
        let mut problem = EquilibriumProblem::new(6.0);
        problem.add_force(2.0);
        let solution = solve_least_squares(&problem).expect("solves");
        let x = solution.magnitudes().expect("solved");

        // Minimise (x)^2 + (2x - 6)^2  =>  x = 12 / 5.
        assert_abs_diff_eq!(x[0], 2.4, epsilon = 1.0e-9);
        let check = solution.check().expect("check present");
        assert!(check.residual_norm > 1.0);
    }

    #[test]
    fn coincident_cancelling_forces_at_origin_resolve_to_zero() {
        let problem = EquilibriumProblem::from_forces(
            vec![
                ForceSpec::new("A", 0.0),
                ForceSpec::new("B", 0.0).with_polarity(Polarity::Negative),
            ],
            0.0,
        );
        let x = solve_least_squares(&problem)
            .expect("solves")
            .magnitudes()
            .expect("solved");
        assert_abs_diff_eq!(x[0], 0.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1.0e-12);
    }
}
