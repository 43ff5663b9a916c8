//! Input description of a set of parallel forces acting along one axis.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::SolveError;

/// Assumed direction of a force along the loading axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// The force acts in the positive sense (+1).
    #[default]
    Positive,
    /// The force acts in the negative sense (-1).
    Negative,
}

impl Polarity {
    /// Signed unit value of the polarity.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// A point force whose magnitude is unknown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceSpec {
    /// Display label, unique within a problem.
    pub name: String,
    /// Coordinate of the point of application in metres.
    pub position: f64,
    /// Direction convention used by the least-squares mode.
    #[serde(default)]
    pub polarity: Polarity,
}

impl ForceSpec {
    /// Create a positively oriented force.
    #[must_use]
    pub fn new(name: impl Into<String>, position: f64) -> Self {
        Self {
            name: name.into(),
            position,
            polarity: Polarity::Positive,
        }
    }

    /// Replace the polarity of the force.
    #[must_use]
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }
}

/// Ordered forces plus the moment they must produce about the origin.
///
/// The order of [`forces`](Self::forces) is the order of the resolved
/// magnitudes.
///
/// # Examples
/// ```
/// use equilibrix::EquilibriumProblem;
///
/// let mut problem = EquilibriumProblem::new(20.0);
/// problem.add_force(0.0);
/// problem.add_force(5.0);
/// assert_eq!(problem.forces()[1].name, "F2");
/// assert!(problem.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumProblem {
    /// Forces in solution order.
    forces: Vec<ForceSpec>,
    /// Required sum of moments about the origin in newton-metres.
    pub target_moment: f64,
}

impl EquilibriumProblem {
    /// Create a problem with no forces yet.
    #[must_use]
    pub fn new(target_moment: f64) -> Self {
        Self {
            forces: Vec::new(),
            target_moment,
        }
    }

    /// Create a problem from an existing force list.
    #[must_use]
    pub fn from_forces(forces: Vec<ForceSpec>, target_moment: f64) -> Self {
        Self {
            forces,
            target_moment,
        }
    }

    /// Forces in solution order.
    #[must_use]
    pub fn forces(&self) -> &[ForceSpec] {
        &self.forces
    }

    /// Number of forces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    /// Whether the problem holds no forces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Append a positive force named after its 1-based slot (`F1`, `F2`, ...).
    ///
    /// When that name is already taken the next free `F{n}` is used. Returns
    /// the index of the new force.
    pub fn add_force(&mut self, position: f64) -> usize {
        let mut slot = self.forces.len() + 1;
        let name = loop {
            let candidate = format!("F{slot}");
            if self.forces.iter().all(|force| force.name != candidate) {
                break candidate;
            }
            slot += 1;
        };
        self.add_named_force(name, position, Polarity::Positive)
    }

    /// Append a fully specified force and return its index.
    pub fn add_named_force(
        &mut self,
        name: impl Into<String>,
        position: f64,
        polarity: Polarity,
    ) -> usize {
        self.forces
            .push(ForceSpec::new(name, position).with_polarity(polarity));
        self.forces.len() - 1
    }

    /// Remove the last force, keeping at least one in the problem.
    pub fn remove_last_force(&mut self) -> Option<ForceSpec> {
        if self.forces.len() > 1 {
            self.forces.pop()
        } else {
            None
        }
    }

    /// Positions of every force in order.
    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        self.forces.iter().map(|force| force.position).collect()
    }

    /// Signed polarity (+1 or -1) of every force in order.
    #[must_use]
    pub fn polarities(&self) -> Vec<f64> {
        self.forces.iter().map(|force| force.polarity.sign()).collect()
    }

    /// Check that the problem can be handed to a solver.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.forces.is_empty() {
            return Err(SolveError::EmptyProblem);
        }
        if !self.target_moment.is_finite() {
            return Err(SolveError::NonFiniteMoment(self.target_moment));
        }
        let mut names = HashSet::with_capacity(self.forces.len());
        for (index, force) in self.forces.iter().enumerate() {
            if !force.position.is_finite() {
                return Err(SolveError::NonFinitePosition {
                    index,
                    position: force.position,
                });
            }
            if !names.insert(force.name.as_str()) {
                return Err(SolveError::DuplicateName(force.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_signs() {
        assert_eq!(Polarity::default(), Polarity::Positive);
        assert_eq!(Polarity::Positive.sign(), 1.0);
        assert_eq!(Polarity::Negative.sign(), -1.0);
    }

    #[test]
    fn add_and_remove_keep_one_force() {
        let mut problem = EquilibriumProblem::new(0.0);
        assert_eq!(problem.add_force(1.0), 0);
        assert_eq!(problem.add_force(2.0), 1);
        assert_eq!(problem.forces()[0].name, "F1");

        let removed = problem.remove_last_force().expect("second force removed");
        assert_eq!(removed.name, "F2");
        assert!(problem.remove_last_force().is_none());
        assert_eq!(problem.len(), 1);
    }

    #[test]
    fn automatic_names_skip_taken_slots() {
        let mut problem = EquilibriumProblem::new(0.0);
        problem.add_named_force("F2", 1.0, Polarity::Negative);
        // Slot 2 is taken by the named force, so the next free name is F3.
        problem.add_force(2.0);
        problem.add_force(3.0);

        let names: Vec<&str> = problem.forces().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["F2", "F3", "F4"]);
        assert_eq!(problem.polarities(), vec![-1.0, 1.0, 1.0]);
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn rejects_invalid_input() {
        assert_eq!(
            EquilibriumProblem::new(1.0).validate(),
            Err(SolveError::EmptyProblem)
        );

        let mut problem = EquilibriumProblem::new(f64::NAN);
        problem.add_force(0.0);
        assert!(matches!(
            problem.validate(),
            Err(SolveError::NonFiniteMoment(_))
        ));

        problem.target_moment = 3.0;
        problem.add_force(f64::INFINITY);
        assert_eq!(
            problem.validate(),
            Err(SolveError::NonFinitePosition {
                index: 1,
                position: f64::INFINITY
            })
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let problem = EquilibriumProblem::from_forces(
            vec![ForceSpec::new("A", 0.0), ForceSpec::new("A", 1.0)],
            0.0,
        );
        assert_eq!(
            problem.validate(),
            Err(SolveError::DuplicateName("A".to_owned()))
        );
    }

    #[test]
    fn polarity_defaults_when_missing_from_json() {
        let force: ForceSpec =
            serde_json::from_str(r#"{"name":"R1","position":2.5}"#).expect("valid json");
        assert_eq!(force.polarity, Polarity::Positive);

        let force: ForceSpec =
            serde_json::from_str(r#"{"name":"R2","position":1.0,"polarity":"negative"}"#)
                .expect("valid json");
        assert_eq!(force.polarity, Polarity::Negative);
    }
}
