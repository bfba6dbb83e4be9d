//! Interface to coloring solvers.

mod minizinc;
pub mod output;

pub use minizinc::MiniZinc;
pub use minizinc::MiniZincConfig;
pub use minizinc::BUNDLED_MODEL;

use std::time::Duration;

use crate::bounds::Bounds;
use crate::coloring::Coloring;
use crate::error::SolverError;
use crate::graph::Graph;

/// Answer of a solver for one window of colors.
#[derive(Debug)]
pub enum Outcome {
    /// A coloring using a number of colors inside the window.
    Solved(Coloring),
    /// No coloring exists with a number of colors inside the window.
    Unsatisfiable,
    /// The solver did not answer in time.
    TimedOut,
    Errored(SolverError),
}

/// Something able to look for a coloring within a window of colors.
pub trait ColoringSolver {
    /// Look for a coloring of `graph` whose number of colors lies in
    /// `bounds`, giving up after `timeout`.
    fn submit(
        &mut self,
        graph: &Graph,
        bounds: Bounds,
        timeout: Duration,
    ) -> Outcome;
}

impl<S: ColoringSolver + ?Sized> ColoringSolver for &mut S {
    fn submit(
        &mut self,
        graph: &Graph,
        bounds: Bounds,
        timeout: Duration,
    ) -> Outcome {
        (**self).submit(graph, bounds, timeout)
    }
}

impl<S: ColoringSolver + ?Sized> ColoringSolver for Box<S> {
    fn submit(
        &mut self,
        graph: &Graph,
        bounds: Bounds,
        timeout: Duration,
    ) -> Outcome {
        (**self).submit(graph, bounds, timeout)
    }
}
