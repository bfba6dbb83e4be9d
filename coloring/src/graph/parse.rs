//! Graph input formats.

use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::bail;
use anyhow::ensure;
use clap::ValueEnum;

use crate::graph::Graph;
use crate::graph::Node;

/// Format of a graph file.
#[derive(ValueEnum, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    /// Guess from the file extension: `.col` is DIMACS, anything else is an
    /// edge list.
    #[default]
    Auto,
    /// `<node_count> <edge_count>` followed by one `<a> <b>` line per edge,
    /// nodes numbered from 0.
    Edges,
    /// DIMACS `.col` file, nodes numbered from 1.
    Dimacs,
}

impl InputFormat {
    /// Resolve `Auto` for the given file.
    pub fn for_path(self, path: &Path) -> Self {
        match self {
            InputFormat::Auto => match path.extension() {
                Some(ext) if ext == "col" => InputFormat::Dimacs,
                _ => InputFormat::Edges,
            },
            format => format,
        }
    }
}

/// Read a graph from a file.
pub fn read_graph(path: &Path, format: InputFormat) -> anyhow::Result<Graph> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    let graph = match format.for_path(path) {
        InputFormat::Dimacs => parse_dimacs(&content),
        _ => parse_edge_list(&content),
    };
    graph.with_context(|| format!("invalid graph in {}", path.display()))
}

fn parse_node(word: Option<&str>, line: usize) -> anyhow::Result<Node> {
    let Some(word) = word else {
        bail!("line {line}: missing node id");
    };
    word.parse()
        .with_context(|| format!("line {line}: invalid node id '{word}'"))
}

/// Parse an edge list.
///
/// ```text
/// 4 3
/// 0 1
/// 1 2
/// 1 3
/// ```
pub fn parse_edge_list(input: &str) -> anyhow::Result<Graph> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let Some((n, header)) = lines.next() else {
        bail!("empty input");
    };
    let mut words = header.split_whitespace();
    let node_count = parse_node(words.next(), n)?;
    let edge_count: usize = parse_node(words.next(), n)
        .context("header must be '<node_count> <edge_count>'")?;

    let mut edges = Vec::with_capacity(edge_count);
    for (n, line) in lines.by_ref().take(edge_count) {
        let mut words = line.split_whitespace();
        let a = parse_node(words.next(), n)?;
        let b = parse_node(words.next(), n)?;
        edges.push((a, b));
    }
    ensure!(
        edges.len() == edge_count,
        "expected {edge_count} edges, found {}",
        edges.len()
    );
    if let Some((n, _)) = lines.next() {
        bail!("line {n}: unexpected content after the last edge");
    }
    Graph::new(node_count, edges)
}

/// Parse a DIMACS graph.
///
/// ```text
/// c triangle
/// p edge 3 3
/// e 1 2
/// e 2 3
/// e 1 3
/// ```
pub fn parse_dimacs(input: &str) -> anyhow::Result<Graph> {
    let mut node_count = None;
    let mut declared_edges = 0;
    let mut edges = vec![];
    for (n, line) in input.lines().enumerate() {
        let n = n + 1;
        let mut words = line.split_whitespace();
        match words.next() {
            None | Some("c") => {}
            Some("p") => {
                ensure!(node_count.is_none(), "line {n}: duplicated problem line");
                ensure!(
                    matches!(words.next(), Some("edge" | "col")),
                    "line {n}: expected 'p edge <nodes> <edges>'"
                );
                node_count = Some(parse_node(words.next(), n)?);
                declared_edges = parse_node(words.next(), n)?;
            }
            Some("e") => {
                ensure!(node_count.is_some(), "line {n}: edge before problem line");
                let a = parse_node(words.next(), n)?;
                let b = parse_node(words.next(), n)?;
                ensure!(a > 0 && b > 0, "line {n}: DIMACS nodes start at 1");
                edges.push((a - 1, b - 1));
            }
            Some(other) => bail!("line {n}: unknown line type '{other}'"),
        }
    }
    let Some(node_count) = node_count else {
        bail!("missing problem line");
    };
    if edges.len() != declared_edges {
        tracing::warn!(
            "problem line declares {declared_edges} edges, found {}",
            edges.len()
        );
    }
    Graph::new(node_count, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_list() {
        let graph = parse_edge_list("4 3\n0 1\n1 2\n1 3\n").unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edges(), &[(0, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn edge_list_without_edges() {
        let graph = parse_edge_list("3 0\n").unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn edge_list_errors() {
        let invalid = [
            "",
            "3",
            "3 2\n0 1\n",
            "3 1\n0 x\n",
            "3 1\n0\n",
            "2 1\n0 2\n",
            "2 1\n0 1\n1 0\n",
        ];
        for input in invalid {
            assert!(parse_edge_list(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn dimacs() {
        let input = "c triangle\np edge 3 3\ne 1 2\ne 2 3\n\ne 1 3\n";
        let graph = parse_dimacs(input).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges(), &[(0, 1), (1, 2), (0, 2)]);
    }

    #[test]
    fn dimacs_errors() {
        let invalid = [
            "e 1 2\n",
            "p edge 2 1\ne 0 1\n",
            "p edge 2 1\ne 1 3\n",
            "p edge 2 1\nx 1 2\n",
            "c nothing\n",
        ];
        for input in invalid {
            assert!(parse_dimacs(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn format_from_extension() {
        let auto = InputFormat::Auto;
        assert_eq!(auto.for_path(Path::new("g.col")), InputFormat::Dimacs);
        assert_eq!(auto.for_path(Path::new("data/gc_20_1")), InputFormat::Edges);
        let forced = InputFormat::Edges;
        assert_eq!(forced.for_path(Path::new("g.col")), InputFormat::Edges);
    }
}
