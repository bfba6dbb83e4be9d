//! Graph coloring through an external MiniZinc solver.
//!
//! The crate reads a graph, estimates bounds on its chromatic number and
//! asks MiniZinc for a coloring with a growing number of colors until one
//! is found. The coloring search itself happens in the external process.

pub mod bounds;
pub mod cli;
pub mod coloring;
pub mod dzn;
pub mod error;
pub mod graph;
pub mod params;
pub mod render;
pub mod search;
pub mod solver;

pub use bounds::Bounds;
pub use coloring::Coloring;
pub use coloring::Solution;
pub use graph::Graph;
