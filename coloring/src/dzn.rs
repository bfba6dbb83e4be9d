//! MiniZinc data files.
//!
//! ```minizinc
//! % automatically generated MiniZinc data file
//! ubc = 2;
//! lbc = 2;
//! nbNodes = 3;
//! nbEdges = 2;
//! edges1 = [0, 1];
//! edges2 = [1, 2];
//! ```

use std::collections::HashMap;

use anyhow::Context;
use anyhow::anyhow;
use anyhow::bail;
use anyhow::ensure;
use itertools::Itertools;

use crate::bounds::Bounds;
use crate::graph::Graph;
use crate::graph::Node;

/// Header comment of generated files.
pub const HEADER: &str = "% automatically generated MiniZinc data file";

/// Types that can be written as MiniZinc data.
pub trait Dzn {
    fn dzn(&self) -> String;
}

impl Dzn for u32 {
    fn dzn(&self) -> String {
        self.to_string()
    }
}

impl Dzn for usize {
    fn dzn(&self) -> String {
        self.to_string()
    }
}

impl<T: Dzn> Dzn for [T] {
    fn dzn(&self) -> String {
        format!("[{}]", self.iter().map(Dzn::dzn).join(", "))
    }
}

/// Content of the data file given to the coloring model.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DataFile {
    pub bounds: Bounds,
    pub node_count: usize,
    pub edges: Vec<(Node, Node)>,
}

impl DataFile {
    pub fn new(graph: &Graph, bounds: Bounds) -> Self {
        Self {
            bounds,
            node_count: graph.node_count(),
            edges: graph.edges().to_vec(),
        }
    }

    /// Parse a data file previously produced by [Dzn::dzn].
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let items = parse_items(input)?;
        let get = |name: &str| {
            items
                .get(name)
                .map(String::as_str)
                .ok_or_else(|| anyhow!("missing '{name}'"))
        };
        let upper: u32 = parse_int(get("ubc")?).context("ubc")?;
        let lower: u32 = parse_int(get("lbc")?).context("lbc")?;
        ensure!(lower <= upper, "lbc is greater than ubc");
        let node_count: usize = parse_int(get("nbNodes")?).context("nbNodes")?;
        let edge_count: usize =
            parse_int(get("nbEdges")?).context("nbEdges")?;
        let sources = parse_array(get("edges1")?).context("edges1")?;
        let targets = parse_array(get("edges2")?).context("edges2")?;
        ensure!(
            sources.len() == edge_count && targets.len() == edge_count,
            "nbEdges is {edge_count} but edge arrays have {} and {} elements",
            sources.len(),
            targets.len()
        );
        if let Some(&node) =
            sources.iter().chain(&targets).find(|&&n| n >= node_count)
        {
            bail!("edge endpoint {node} is not below nbNodes = {node_count}");
        }
        Ok(Self {
            bounds: Bounds::new(lower, upper),
            node_count,
            edges: sources.into_iter().zip(targets).collect(),
        })
    }
}

impl Dzn for DataFile {
    fn dzn(&self) -> String {
        let (sources, targets): (Vec<Node>, Vec<Node>) =
            self.edges.iter().copied().unzip();
        let mut s = String::new();
        s += HEADER;
        s += "\n";
        s += &format!("ubc = {};\n", self.bounds.upper.dzn());
        s += &format!("lbc = {};\n", self.bounds.lower.dzn());
        s += &format!("nbNodes = {};\n", self.node_count.dzn());
        s += &format!("nbEdges = {};\n", self.edges.len().dzn());
        s += &format!("edges1 = {};\n", sources.dzn());
        s += &format!("edges2 = {};\n", targets.dzn());
        s
    }
}

/// Split `name = value;` items, dropping `%` comments.
fn parse_items(input: &str) -> anyhow::Result<HashMap<String, String>> {
    let text = input
        .lines()
        .map(|line| line.split_once('%').map_or(line, |(code, _)| code))
        .join("\n");
    let mut items = HashMap::new();
    for item in text.split(';').map(str::trim).filter(|i| !i.is_empty()) {
        let Some((name, value)) = item.split_once('=') else {
            bail!("expected 'name = value', found '{item}'");
        };
        let name = name.trim();
        ensure!(
            items.insert(name.to_string(), value.trim().to_string()).is_none(),
            "'{name}' is assigned twice"
        );
    }
    Ok(items)
}

fn parse_int<T: std::str::FromStr>(value: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("'{value}' is not an integer"))
}

fn parse_array(value: &str) -> anyhow::Result<Vec<Node>> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| anyhow!("'{value}' is not an array"))?;
    inner
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_int::<Node>)
        .collect()
}
