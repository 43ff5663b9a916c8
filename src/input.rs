use std::fs;
use std::path::{Path, PathBuf};

use equilibrix::{EquilibriumProblem, EquilibriumSolver, SolveRequest};
use thiserror::Error;

/// Error returned when a request document cannot be loaded.
#[derive(Debug, Error)]
pub enum InputError {
    /// Returned when the file cannot be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Returned when the file is not a valid request.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Three positive forces at 0, 2 and 4 m that must produce 10 N·m.
pub fn demo_request() -> SolveRequest {
    let mut problem = EquilibriumProblem::new(10.0);
    for position in [0.0, 2.0, 4.0] {
        problem.add_force(position);
    }
    SolveRequest {
        problem,
        solver: EquilibriumSolver::default(),
    }
}

/// Load the request at `path`, or the demo request when no path is given.
pub fn load_request(path: Option<PathBuf>) -> Result<SolveRequest, InputError> {
    match path {
        Some(path) => read_request(&path),
        None => {
            tracing::info!("no request file given, solving the built-in example");
            Ok(demo_request())
        }
    }
}

/// Read and parse a JSON request document.
fn read_request(path: &Path) -> Result<SolveRequest, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
