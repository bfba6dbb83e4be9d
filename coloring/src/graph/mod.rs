//! Undirected graphs to color.

mod parse;

pub use parse::InputFormat;
pub use parse::parse_dimacs;
pub use parse::parse_edge_list;
pub use parse::read_graph;

use anyhow::ensure;
use petgraph::graph::NodeIndex;
use petgraph::graph::UnGraph;

/// Identifier of a node, between `0` and `node_count - 1`.
pub type Node = usize;

/// A graph given as a number of nodes and a list of edges.
///
/// The edge list is kept in input order, duplicates included, since it is
/// forwarded verbatim to the solver. Adjacency queries work on a
/// deduplicated view.
#[derive(Clone, Debug)]
pub struct Graph {
    edges: Vec<(Node, Node)>,
    adjacency: UnGraph<(), ()>,
}

impl Graph {
    /// Create a graph with `node_count` nodes and the given edges.
    ///
    /// Return an `Error` if an edge refers to an unknown node or is a
    /// self-loop, which no coloring can satisfy.
    pub fn new(
        node_count: usize,
        edges: Vec<(Node, Node)>,
    ) -> anyhow::Result<Self> {
        let mut adjacency = UnGraph::with_capacity(node_count, edges.len());
        for _ in 0..node_count {
            adjacency.add_node(());
        }
        for &(a, b) in &edges {
            ensure!(
                a < node_count && b < node_count,
                "edge ({a}, {b}) refers to a node outside 0..{node_count}"
            );
            ensure!(a != b, "self-loop on node {a} cannot be colored");
            adjacency.update_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        Ok(Self { edges, adjacency })
    }

    /// Complete graph on `n` nodes.
    pub fn complete(n: usize) -> Self {
        let edges: Vec<(Node, Node)> = (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .collect();
        let mut adjacency = UnGraph::with_capacity(n, edges.len());
        for _ in 0..n {
            adjacency.add_node(());
        }
        for &(a, b) in &edges {
            adjacency.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        Self { edges, adjacency }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.node_count()
    }

    /// Number of edges as given in the input, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(Node, Node)] {
        &self.edges
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> {
        0..self.node_count()
    }

    /// Distinct neighbours of `node`.
    pub fn neighbors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency
            .neighbors(NodeIndex::new(node))
            .map(|n| n.index())
    }

    pub fn degree(&self, node: Node) -> usize {
        self.neighbors(node).count()
    }

    pub fn max_degree(&self) -> usize {
        self.nodes().map(|n| self.degree(n)).max().unwrap_or(0)
    }

    pub fn adjacent(&self, a: Node, b: Node) -> bool {
        self.adjacency
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }
}
