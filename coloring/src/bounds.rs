//! Heuristic bounds on the number of colors.

use std::fmt;

use itertools::Itertools;

use crate::graph::Graph;
use crate::graph::Node;
use crate::params::CLIQUE_NODE_LIMIT;

/// Window of color counts submitted to the solver, both ends inclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Bounds {
    pub lower: u32,
    pub upper: u32,
}

impl Bounds {
    pub fn new(lower: u32, upper: u32) -> Self {
        debug_assert!(lower <= upper);
        Self { lower, upper }
    }

    /// Window containing only `colors`.
    pub fn exactly(colors: u32) -> Self {
        Self::new(colors, colors)
    }

    /// Shift both ends of the window by one color.
    pub fn widen(self) -> Self {
        Self::new(self.lower + 1, self.upper + 1)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Initial bounds of a graph.
#[derive(Clone, Debug)]
pub struct Estimate {
    /// Clique used as lower bound, empty if the clique search was skipped.
    pub clique: Vec<Node>,
    /// Number of colors needed at least.
    pub lower: u32,
    /// Number of colors always sufficient: max degree + 1.
    pub ceiling: u32,
}

impl Estimate {
    /// Compute the bounds of `graph`.
    ///
    /// The clique search is skipped above
    /// [`CLIQUE_NODE_LIMIT`](crate::params::CLIQUE_NODE_LIMIT) nodes, the
    /// lower bound is then 1.
    pub fn of(graph: &Graph) -> Self {
        Self::with_clique_limit(graph, CLIQUE_NODE_LIMIT.get())
    }

    pub fn with_clique_limit(graph: &Graph, limit: usize) -> Self {
        let clique = if graph.node_count() <= limit {
            greedy_clique(graph)
        } else {
            tracing::debug!(
                "{} nodes, skipping clique search",
                graph.node_count()
            );
            vec![]
        };
        let lower = (clique.len() as u32).max(1);
        let ceiling = graph.max_degree() as u32 + 1;
        Self {
            clique,
            lower: lower.min(ceiling),
            ceiling,
        }
    }

    /// First window to submit.
    pub fn window(&self) -> Bounds {
        Bounds::exactly(self.lower)
    }

    /// Maximum number of solver calls needed to go from the first window
    /// to the ceiling.
    pub fn max_iterations(&self) -> u32 {
        self.ceiling - self.lower + 1
    }
}

/// Large clique found greedily.
///
/// Starting from each node, neighbours are considered by decreasing degree
/// and added when adjacent to every node already picked. The largest clique
/// over all starting nodes is returned.
pub fn greedy_clique(graph: &Graph) -> Vec<Node> {
    let by_degree = |n: &Node| std::cmp::Reverse(graph.degree(*n));
    let mut best: Vec<Node> = vec![];
    for start in graph.nodes().sorted_by_key(by_degree) {
        if graph.degree(start) < best.len() {
            // a clique through `start` has at most degree + 1 nodes
            continue;
        }
        let mut clique = vec![start];
        for candidate in graph.neighbors(start).sorted_by_key(by_degree) {
            if clique.iter().all(|&n| graph.adjacent(n, candidate)) {
                clique.push(candidate);
            }
        }
        if clique.len() > best.len() {
            best = clique;
        }
    }
    best.sort_unstable();
    best
}
