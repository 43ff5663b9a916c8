//! Resolved magnitudes and the equilibrium readout that accompanies them.

use serde::Serialize;

/// Outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveStatus {
    /// Magnitudes were found.
    Solved,
    /// The equality constraints could not be met.
    Infeasible {
        /// Largest constraint violation of the final iterate.
        constraint_violation: f64,
    },
}

/// A force together with its resolved magnitude.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedForce {
    /// Display label copied from the problem.
    pub name: String,
    /// Position in metres.
    pub position: f64,
    /// Resolved magnitude in newtons.
    pub magnitude: f64,
}

/// Sums recomputed from a set of magnitudes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EquilibriumCheck {
    /// Net force in newtons.
    pub sum_force: f64,
    /// Net moment about the origin in newton-metres.
    pub sum_moment: f64,
    /// Absolute difference between the net moment and the target moment.
    pub moment_deviation: f64,
    /// Euclidean norm of the residual of both balance equations.
    pub residual_norm: f64,
}

impl EquilibriumCheck {
    /// Whether both balance equations hold within `tolerance`.
    #[must_use]
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        self.sum_force.abs() <= tolerance && self.moment_deviation <= tolerance
    }
}

/// Result of resolving an [`EquilibriumProblem`](crate::EquilibriumProblem).
///
/// A solution is created once per solve and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EquilibriumSolution {
    /// Whether magnitudes were found.
    #[serde(flatten)]
    status: SolveStatus,
    /// Resolved forces in problem order, empty when infeasible.
    forces: Vec<ResolvedForce>,
    /// Balance readout of the magnitudes, absent when infeasible.
    check: Option<EquilibriumCheck>,
    /// Number of solver iterations used.
    iterations: usize,
}

impl EquilibriumSolution {
    /// Build a solution that carries magnitudes and their readout.
    pub(crate) fn solved(
        forces: Vec<ResolvedForce>,
        check: EquilibriumCheck,
        iterations: usize,
    ) -> Self {
        Self {
            status: SolveStatus::Solved,
            forces,
            check: Some(check),
            iterations,
        }
    }

    /// Build a solution that reports only the constraint violation.
    pub(crate) fn infeasible(constraint_violation: f64, iterations: usize) -> Self {
        Self {
            status: SolveStatus::Infeasible {
                constraint_violation,
            },
            forces: Vec::new(),
            check: None,
            iterations,
        }
    }

    /// Outcome of the solve.
    #[must_use]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Whether magnitudes were found.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }

    /// Magnitudes in problem order, or `None` when the problem was infeasible.
    #[must_use]
    pub fn magnitudes(&self) -> Option<Vec<f64>> {
        self.is_solved()
            .then(|| self.forces.iter().map(|force| force.magnitude).collect())
    }

    /// Resolved forces in problem order; empty when infeasible.
    #[must_use]
    pub fn forces(&self) -> &[ResolvedForce] {
        &self.forces
    }

    /// Equilibrium readout of the resolved magnitudes.
    #[must_use]
    pub fn check(&self) -> Option<&EquilibriumCheck> {
        self.check.as_ref()
    }

    /// Number of iterations the solver used.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_check() -> EquilibriumCheck {
        EquilibriumCheck {
            sum_force: 0.0,
            sum_moment: 20.0,
            moment_deviation: 0.0,
            residual_norm: 0.0,
        }
    }

    #[test]
    fn solved_exposes_magnitudes() {
        let solution = EquilibriumSolution::solved(
            vec![
                ResolvedForce {
                    name: "F1".into(),
                    position: 0.0,
                    magnitude: -4.0,
                },
                ResolvedForce {
                    name: "F2".into(),
                    position: 5.0,
                    magnitude: 4.0,
                },
            ],
            sample_check(),
            1,
        );
        assert!(solution.is_solved());
        assert_eq!(solution.magnitudes(), Some(vec![-4.0, 4.0]));
        assert!(solution.check().expect("check present").is_balanced(1.0e-12));
    }

    #[test]
    fn infeasible_hides_magnitudes() {
        let solution = EquilibriumSolution::infeasible(1.5, 3);
        assert!(!solution.is_solved());
        assert_eq!(solution.magnitudes(), None);
        assert!(solution.forces().is_empty());
        assert!(solution.check().is_none());
        assert_eq!(
            solution.status(),
            SolveStatus::Infeasible {
                constraint_violation: 1.5
            }
        );
    }

    #[test]
    fn serializes_status_inline() {
        let json = serde_json::to_value(EquilibriumSolution::infeasible(2.0, 4))
            .expect("solution serializes");
        assert_eq!(json["status"], "infeasible");
        assert_eq!(json["constraint_violation"], 2.0);
        assert_eq!(json["iterations"], 4);
    }
}
