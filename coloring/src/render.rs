//! Graphviz rendering of a colored graph.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Context;
use anyhow::ensure;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::coloring::Coloring;
use crate::graph::Graph;

/// SVG color names used to fill nodes.
pub const PALETTE: &[&str] = &[
    "aquamarine", "bisque", "blueviolet", "burlywood", "cadetblue",
    "chartreuse", "chocolate", "coral", "cornflowerblue", "crimson",
    "darkcyan", "darkgoldenrod", "darkkhaki", "darkorange", "darkorchid",
    "darksalmon", "darkseagreen", "deeppink", "deepskyblue", "dodgerblue",
    "firebrick", "forestgreen", "gold", "goldenrod", "greenyellow",
    "hotpink", "indianred", "khaki", "lavender", "lightblue", "lightcoral",
    "lightgreen", "lightpink", "lightsalmon", "lightseagreen",
    "lightskyblue", "lime", "magenta", "mediumorchid", "mediumpurple",
    "mediumseagreen", "moccasin", "olivedrab", "orange", "orangered",
    "orchid", "palegreen", "paleturquoise", "peru", "pink", "plum",
    "powderblue", "rosybrown", "royalblue", "salmon", "sandybrown",
    "seagreen", "sienna", "skyblue", "slateblue", "springgreen", "steelblue",
    "tan", "thistle", "tomato", "turquoise", "violet", "wheat",
    "yellow", "yellowgreen",
];

/// Pick a fill color for each of the `count` colors of a coloring.
///
/// The choice only depends on `seed`. Colors are distinct as long as
/// `count` does not exceed the palette size, they are reused otherwise.
pub fn pick_colors(count: usize, seed: u64) -> Vec<&'static str> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut palette = PALETTE.to_vec();
    palette.shuffle(&mut rng);
    if count > palette.len() {
        tracing::warn!(
            "{count} colors but only {} in the palette, some will be reused",
            palette.len()
        );
    }
    palette.into_iter().cycle().take(count).collect()
}

/// Graphviz description of `graph`, nodes filled with `fills[color]`, plus
/// a legend cluster with one node per color.
pub fn to_dot(
    graph: &Graph,
    coloring: &Coloring,
    fills: &[&str],
) -> anyhow::Result<String> {
    ensure!(
        coloring.colors().len() == graph.node_count(),
        "coloring does not match the graph"
    );
    let mut dot = String::from("strict graph {\n");
    for (node, &color) in coloring.colors().iter().enumerate() {
        let fill = fills
            .get(color as usize)
            .with_context(|| format!("no fill for color {color}"))?;
        writeln!(dot, "  {node} [style=filled, fillcolor={fill}];")?;
    }
    for &(a, b) in graph.edges() {
        writeln!(dot, "  {a} -- {b};")?;
    }
    dot += "  subgraph cluster_legend {\n";
    dot += "    label=legend;\n    color=black;\n    rank=same;\n";
    for (i, fill) in fills.iter().enumerate() {
        writeln!(dot, "    c{i} [style=filled, fillcolor={fill}];")?;
    }
    dot += "  }\n}\n";
    Ok(dot)
}

/// Files produced by [render].
#[derive(Debug)]
pub struct Rendered {
    pub dot: PathBuf,
    /// Absent if Graphviz could not be run.
    pub image: Option<PathBuf>,
}

/// Write `graph.dot` in `dir` and try to lay it out into `graph.png` with
/// the Graphviz `dot` program.
pub fn render(
    graph: &Graph,
    coloring: &Coloring,
    seed: u64,
    dir: &Path,
) -> anyhow::Result<Rendered> {
    let fills = pick_colors(coloring.num_colors() as usize, seed);
    tracing::debug!(?fills, "selected colors");
    let dot = dir.join("graph.dot");
    fs::write(&dot, to_dot(graph, coloring, &fills)?)
        .with_context(|| format!("unable to write {}", dot.display()))?;

    let image = dir.join("graph.png");
    let status = Command::new("dot")
        .arg("-Tpng")
        .arg(&dot)
        .arg("-o")
        .arg(&image)
        .status();
    let image = match status {
        Ok(status) if status.success() => Some(image),
        Ok(status) => {
            tracing::warn!("graphviz exited with {status}");
            None
        }
        Err(err) => {
            tracing::warn!("unable to run graphviz: {err}");
            None
        }
    };
    Ok(Rendered { dot, image })
}
