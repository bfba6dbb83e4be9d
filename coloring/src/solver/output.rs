//! Parsing of the solver standard output.
//!
//! A satisfiable answer is the number of colors followed by the color of
//! each node:
//! ```text
//! 2
//! [1, 0, 1, 1]
//! ----------
//! ==========
//! ```
//! An unsatisfiable one starts with `=====UNSATISFIABLE=====`.

use crate::coloring::Coloring;
use crate::error::FormatError;
use crate::graph::Graph;

/// Marker of an unsatisfiable problem.
pub const UNSAT: &str = "UNSATISFIABLE";

/// Status lines of MiniZinc that carry no solution.
const STATUS_PREFIX: &str = "=====";

/// Solver answer to a single window.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Answer {
    Unsatisfiable,
    Solved(Coloring),
}

/// Parse the solver output for a graph with `node_count` nodes.
pub fn parse_answer(
    stdout: &str,
    node_count: usize,
) -> Result<Answer, FormatError> {
    let mut lines = stdout.lines().map(str::trim).skip_while(|l| l.is_empty());
    let first = lines.next().ok_or(FormatError::EmptyOutput)?;
    if first.contains(UNSAT) {
        return Ok(Answer::Unsatisfiable);
    }
    if first.starts_with(STATUS_PREFIX) {
        return Err(FormatError::Status(first.to_string()));
    }
    let num_colors = first
        .parse()
        .map_err(|_| FormatError::ColorCount(first.to_string()))?;
    let assignment = lines.next().ok_or(FormatError::MissingAssignment)?;
    let colors = parse_colors(assignment)?;
    if colors.len() != node_count {
        return Err(FormatError::LengthMismatch {
            expected: node_count,
            found: colors.len(),
        });
    }
    Ok(Answer::Solved(Coloring::new(num_colors, colors)))
}

/// Parse the solver output and check the coloring against `graph`.
pub fn parse_checked(stdout: &str, graph: &Graph) -> Result<Answer, FormatError> {
    let answer = parse_answer(stdout, graph.node_count())?;
    if let Answer::Solved(coloring) = &answer {
        coloring.check(graph)?;
    }
    Ok(answer)
}

/// Parse a list such as `[1, 0, 1, 1]`.
fn parse_colors(line: &str) -> Result<Vec<u32>, FormatError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(|| FormatError::NotAList(line.to_string()))?;
    if inner.trim().is_empty() {
        return Ok(vec![]);
    }
    inner
        .split(',')
        .map(str::trim)
        .map(|c| c.parse().map_err(|_| FormatError::Color(c.to_string())))
        .collect()
}
