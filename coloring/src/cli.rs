//! Command line interface.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use crate::coloring::Solution;
use crate::graph::InputFormat;
use crate::graph::read_graph;
use crate::render::render;
use crate::search::Search;
use crate::solver::MiniZinc;
use crate::solver::MiniZincConfig;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Graph coloring with MiniZinc.",
    long_about = "Find a coloring with as few colors as possible by asking \
                  MiniZinc for colorings with a growing number of colors."
)]
pub struct Args {
    /// Graph to color.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Format of the graph file.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: InputFormat,

    /// MiniZinc executable.
    #[arg(long, value_name = "PATH", default_value = "minizinc")]
    pub minizinc: PathBuf,

    /// MiniZinc model to use instead of the bundled one.
    #[arg(short, long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// MiniZinc backend, e.g. gecode, chuffed or cbc.
    #[arg(short, long, value_name = "ID")]
    pub solver: Option<String>,

    /// Extra argument given to MiniZinc, may be repeated.
    #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub solver_args: Vec<String>,

    /// Time limit of each MiniZinc call, in seconds.
    #[arg(short, long, value_name = "SECS", default_value_t = 30.0)]
    pub timeout: f64,

    /// Keep the generated MiniZinc files in this directory.
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Write graph.dot and graph.png showing the coloring.
    #[arg(short, long)]
    pub debug: bool,

    /// Directory receiving the debug pictures.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Seed of the color choice of the pictures.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Logging level to use: one of "error", "warn", "info", "debug", "trace".
    #[arg(short, long, default_value = "warn")]
    pub log_level: tracing::Level,
}

impl Args {
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        Duration::try_from_secs_f64(self.timeout)
            .with_context(|| format!("invalid timeout: {}", self.timeout))
    }

    pub fn minizinc_config(&self) -> MiniZincConfig {
        MiniZincConfig {
            program: self.minizinc.clone(),
            args: self.solver_args.clone(),
            backend: self.solver.clone(),
            model: self.model.clone(),
            work_dir: self.work_dir.clone(),
        }
    }
}

/// Return command line args.
pub fn parse_args() -> Args {
    Args::parse()
}

/// Color the input graph with the given args.
pub fn run(args: &Args) -> anyhow::Result<Solution> {
    let timeout = args.timeout()?;
    tracing::info!("solving {}", args.input.display());
    let graph = read_graph(&args.input, args.format)?;
    tracing::info!(
        "{} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let solver = MiniZinc::new(args.minizinc_config())?;
    let solution = Search::new(&graph, solver, timeout).run()?;

    if args.debug {
        // the coloring is printed even if it cannot be drawn
        match render(&graph, &solution.coloring, args.seed, &args.output_dir)
            .context("unable to render the coloring")
        {
            Ok(rendered) => {
                tracing::info!("coloring written to {}", rendered.dot.display())
            }
            Err(e) => tracing::warn!("{e:#}"),
        }
    }
    Ok(solution)
}
