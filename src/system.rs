//! The two balance equations shared by both solve modes.

use nalgebra::{DMatrix, DVector, SVD};

use crate::errors::SolveError;
use crate::problem::EquilibriumProblem;
use crate::solution::{EquilibriumCheck, ResolvedForce};

/// Force balance and moment balance written as `A x = b`.
///
/// Row 0 of `A` sums the forces, row 1 sums their moments about the origin.
#[derive(Clone, Debug)]
pub(crate) struct BalanceSystem {
    /// Coefficient matrix `A`, two rows by one column per force.
    pub(crate) matrix: DMatrix<f64>,
    /// Right-hand side `b = [0, target_moment]`.
    pub(crate) rhs: DVector<f64>,
}

impl BalanceSystem {
    /// Coefficients scaled by each force's polarity.
    pub(crate) fn with_polarity(problem: &EquilibriumProblem) -> Self {
        let signs = problem.polarities();
        let positions = problem.positions();
        let moments: Vec<f64> = positions
            .iter()
            .zip(&signs)
            .map(|(position, sign)| position * sign)
            .collect();
        Self::from_rows(&signs, &moments, problem.target_moment)
    }

    /// Unit force coefficients, as used by the constrained mode.
    pub(crate) fn unsigned(problem: &EquilibriumProblem) -> Self {
        let ones = vec![1.0; problem.len()];
        Self::from_rows(&ones, &problem.positions(), problem.target_moment)
    }

    /// Stack the force row and moment row into `A` and pair it with `b`.
    fn from_rows(force_row: &[f64], moment_row: &[f64], target_moment: f64) -> Self {
        let n = force_row.len();
        let mut matrix = DMatrix::zeros(2, n);
        for col in 0..n {
            matrix[(0, col)] = force_row[col];
            matrix[(1, col)] = moment_row[col];
        }
        Self {
            matrix,
            rhs: DVector::from_column_slice(&[0.0, target_moment]),
        }
    }

    /// Number of unknown magnitudes.
    pub(crate) fn unknowns(&self) -> usize {
        self.matrix.ncols()
    }

    /// `A x - b`.
    pub(crate) fn residual(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.matrix * x - &self.rhs
    }

    /// Largest absolute residual of the two equations.
    pub(crate) fn violation(&self, x: &DVector<f64>) -> f64 {
        self.residual(x).amax()
    }

    /// Recompute the balance readout for `x`.
    pub(crate) fn check(&self, x: &DVector<f64>) -> EquilibriumCheck {
        let sums = &self.matrix * x;
        let sum_moment = sums[1];
        EquilibriumCheck {
            sum_force: sums[0],
            sum_moment,
            moment_deviation: (sum_moment - self.rhs[1]).abs(),
            residual_norm: self.residual(x).norm(),
        }
    }
}

/// Machine epsilon scaled by the larger matrix dimension.
pub(crate) fn machine_rcond(matrix: &DMatrix<f64>) -> f64 {
    f64::EPSILON * matrix.nrows().max(matrix.ncols()) as f64
}

/// Refinement passes applied after the first SVD solve.
const REFINEMENT_STEPS: usize = 2;

/// Minimum-norm least-squares solution of `matrix * x = rhs`.
///
/// Singular values below `rcond * sigma_max` are treated as zero, so
/// rank-deficient systems still yield the smallest-norm minimiser. The zero
/// matrix maps to the zero vector.
///
/// Widely spread positions make the decomposition lose digits, so the answer
/// is polished with iterative refinement on the same decomposition
/// (<https://en.wikipedia.org/wiki/Iterative_refinement>).
pub(crate) fn min_norm_solve(
    matrix: &DMatrix<f64>,
    rhs: &DVector<f64>,
    rcond: f64,
) -> Result<DVector<f64>, SolveError> {
    let svd = SVD::new(matrix.clone(), true, true);
    let sigma_max = svd.singular_values.max();
    if sigma_max == 0.0 {
        return Ok(DVector::zeros(matrix.ncols()));
    }
    let cutoff = rcond * sigma_max;
    let mut x = svd.solve(rhs, cutoff).map_err(SolveError::Decomposition)?;
    for _ in 0..REFINEMENT_STEPS {
        let residual = rhs - matrix * &x;
        x += svd
            .solve(&residual, cutoff)
            .map_err(SolveError::Decomposition)?;
    }
    Ok(x)
}

/// Pair each magnitude with the force it belongs to.
pub(crate) fn resolve_forces(problem: &EquilibriumProblem, x: &DVector<f64>) -> Vec<ResolvedForce> {
    problem
        .forces()
        .iter()
        .zip(x.iter())
        .map(|(force, &magnitude)| ResolvedForce {
            name: force.name.clone(),
            position: force.position,
            magnitude,
        })
        .collect()
}
