use equilibrix::{EquilibriumSolution, SolveMode, SolveRequest, SolveStatus};
use std::fmt::Write;

/// Render the textual readout of a solve.
///
/// Infeasible results print only the failure message so no magnitudes can be
/// mistaken for an answer.
#[must_use]
pub fn render_solution(request: &SolveRequest, solution: &EquilibriumSolution) -> String {
    let mut output = String::new();

    // State the problem first: how many forces, the moment they must produce
    // and which strategy picked the magnitudes out of the two equations.
    let mode = match &request.solver.mode {
        SolveMode::LeastSquares => "least squares",
        SolveMode::Constrained { .. } => "constrained",
    };

    writeln!(
        &mut output,
        "Equilibrium of {} parallel forces (target moment = {:.2} Nm, {mode})",
        request.problem.len(),
        request.problem.target_moment
    )
    .expect("writing to string cannot fail");

    // A contradictory layout (e.g. every force at one position with a
    // non-zero target moment) has no answer. Say so and stop, so nothing
    // below can be read as a set of zero forces.
    if let SolveStatus::Infeasible {
        constraint_violation,
    } = solution.status()
    {
        writeln!(
            &mut output,
            "No forces satisfy both equilibrium conditions (constraint violation = {constraint_violation:.3e})"
        )
        .expect("writing to string cannot fail");
        return output;
    }

    // One line per force in input order. The sign gives the direction along
    // the axis, see https://en.wikipedia.org/wiki/Statics.
    for force in solution.forces() {
        writeln!(
            &mut output,
            "{} = {:.4} N at x = {:.2} m",
            force.name, force.magnitude, force.position
        )
        .expect("writing to string cannot fail");
    }

    // Close with the verification readout: the net force should vanish and
    // the net moment should match the target
    // (https://en.wikipedia.org/wiki/Mechanical_equilibrium).
    if let Some(check) = solution.check() {
        writeln!(&mut output, "Sum of forces = {:.4} N", check.sum_force)
            .expect("writing to string cannot fail");
        writeln!(&mut output, "Sum of moments = {:.4} Nm", check.sum_moment)
            .expect("writing to string cannot fail");
        writeln!(
            &mut output,
            "Absolute moment deviation = {:.10} Nm",
            check.moment_deviation
        )
        .expect("writing to string cannot fail");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use equilibrix::{EquilibriumProblem, EquilibriumSolver, Objective};

    fn request(positions: &[f64], target_moment: f64, mode: SolveMode) -> SolveRequest {
        let mut problem = EquilibriumProblem::new(target_moment);
        for &position in positions {
            problem.add_force(position);
        }
        SolveRequest {
            problem,
            solver: EquilibriumSolver::new(mode),
        }
    }

    #[test]
    fn formats_resolved_forces() {
        let request = request(
            &[0.0, 5.0],
            20.0,
            SolveMode::Constrained {
                objective: Objective::Feasibility,
            },
        );
        let solution = request.solve().expect("valid problem");
        let report = render_solution(&request, &solution);
        assert!(report.contains("target moment = 20.00 Nm, constrained"));
        assert!(report.contains("F1 = -4.0000 N at x = 0.00 m"));
        assert!(report.contains("F2 = 4.0000 N at x = 5.00 m"));
        assert!(report.contains("Sum of moments = 20.0000 Nm"));
    }

    #[test]
    fn infeasible_report_has_no_magnitudes() {
        let request = request(
            &[3.0, 3.0],
            5.0,
            SolveMode::Constrained {
                objective: Objective::Feasibility,
            },
        );
        let solution = request.solve().expect("valid problem");
        let report = render_solution(&request, &solution);
        assert!(report.contains("No forces satisfy both equilibrium conditions"));
        assert!(!report.contains("F1 ="));
        assert!(!report.contains("Sum of forces"));
    }
}
