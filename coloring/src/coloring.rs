//! Color assignments and their textual output.

use std::fmt;

use itertools::Itertools;

use crate::error::FormatError;
use crate::graph::Graph;

/// Color of every node, as reported by the solver.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Coloring {
    num_colors: u32,
    colors: Vec<u32>,
}

impl Coloring {
    pub fn new(num_colors: u32, colors: Vec<u32>) -> Self {
        Self { num_colors, colors }
    }

    /// Number of colors reported by the solver.
    pub fn num_colors(&self) -> u32 {
        self.num_colors
    }

    /// Color of each node, indexed by node id.
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Number of distinct colors actually used.
    pub fn distinct_colors(&self) -> usize {
        self.colors.iter().unique().count()
    }

    /// Check that this is a proper coloring of `graph` using colors
    /// `0..num_colors` only.
    pub fn check(&self, graph: &Graph) -> Result<(), FormatError> {
        if self.colors.len() != graph.node_count() {
            return Err(FormatError::LengthMismatch {
                expected: graph.node_count(),
                found: self.colors.len(),
            });
        }
        if let Some((node, &color)) = self
            .colors
            .iter()
            .enumerate()
            .find(|&(_, &color)| color >= self.num_colors)
        {
            return Err(FormatError::ColorOutOfRange {
                node,
                color,
                num_colors: self.num_colors,
            });
        }
        for &(a, b) in graph.edges() {
            if self.colors[a] == self.colors[b] {
                return Err(FormatError::Conflict {
                    nodes: (a, b),
                    color: self.colors[a],
                });
            }
        }
        Ok(())
    }
}

/// Final answer of a search.
///
/// Displayed as `<num_colors> <optimal>` on a first line, then the color of
/// every node:
/// ```text
/// 2 1
/// 0 1 0 0
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Solution {
    pub coloring: Coloring,
    /// No coloring with fewer colors exists.
    pub optimal: bool,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            self.coloring.num_colors,
            u8::from(self.optimal)
        )?;
        write!(f, "{}", self.coloring.colors.iter().join(" "))
    }
}
