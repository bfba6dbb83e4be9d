//! Errors of the solving loop.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::bounds::Bounds;
use crate::graph::Node;

/// The solver answered, but not in the expected shape.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum FormatError {
    #[error("solver output is empty")]
    EmptyOutput,
    #[error("solver reported no assignment after the color count")]
    MissingAssignment,
    #[error("solver reported an unknown status: {0}")]
    Status(String),
    #[error("invalid color count '{0}'")]
    ColorCount(String),
    #[error("assignment is not a bracketed list: '{0}'")]
    NotAList(String),
    #[error("invalid color '{0}'")]
    Color(String),
    #[error("expected a color for each of the {expected} nodes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("node {node} has color {color}, outside of the {num_colors} reported colors")]
    ColorOutOfRange { node: Node, color: u32, num_colors: u32 },
    #[error("nodes {} and {} share color {color}", .nodes.0, .nodes.1)]
    Conflict { nodes: (Node, Node), color: u32 },
}

/// A single solver call went wrong.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("unable to prepare {}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to run '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("lost track of the solver process")]
    Wait(#[source] io::Error),
    #[error("solver exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Reason why the search stopped without a coloring.
#[derive(Error, Debug)]
pub enum SearchFailure {
    #[error(
        "solver did not answer within {:.1}s for colors in {window}",
        .timeout.as_secs_f64()
    )]
    SolverTimeout { window: Bounds, timeout: Duration },
    #[error("solver failed for colors in {window}")]
    SolverProcess {
        window: Bounds,
        #[source]
        source: SolverError,
    },
    #[error("no coloring found with up to {ceiling} colors")]
    UnsatisfiableAtBound { ceiling: u32 },
    #[error("unexpected solver output for colors in {window}")]
    OutputFormat {
        window: Bounds,
        #[source]
        source: FormatError,
    },
}

impl SearchFailure {
    /// Classify a solver error raised while trying `window`.
    pub fn from_solver(window: Bounds, error: SolverError) -> Self {
        match error {
            SolverError::Format(source) => {
                SearchFailure::OutputFormat { window, source }
            }
            source => SearchFailure::SolverProcess { window, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_are_not_process_errors() {
        let window = Bounds::exactly(3);
        let error = FormatError::LengthMismatch { expected: 4, found: 3 };
        let failure = SearchFailure::from_solver(window, error.into());
        assert!(matches!(failure, SearchFailure::OutputFormat { .. }));

        let error = SolverError::Wait(io::Error::other("gone"));
        let failure = SearchFailure::from_solver(window, error);
        assert!(matches!(failure, SearchFailure::SolverProcess { .. }));
    }

    #[test]
    fn messages() {
        let failure = SearchFailure::SolverTimeout {
            window: Bounds::exactly(3),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            failure.to_string(),
            "solver did not answer within 30.0s for colors in [3, 3]"
        );
        let failure = SearchFailure::UnsatisfiableAtBound { ceiling: 4 };
        assert_eq!(failure.to_string(), "no coloring found with up to 4 colors");
    }
}
