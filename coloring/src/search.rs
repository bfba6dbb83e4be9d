//! Search for the smallest number of colors.
//!
//! The search starts with a window holding the clique lower bound and asks
//! the solver for a coloring within it. Each time the solver proves the
//! window unsatisfiable, both of its ends are moved up by one color, until
//! the ceiling (max degree + 1) is tried. Any timeout or error stops the
//! search.

use std::time::Duration;

use crate::bounds::Bounds;
use crate::bounds::Estimate;
use crate::coloring::Coloring;
use crate::coloring::Solution;
use crate::error::SearchFailure;
use crate::graph::Graph;
use crate::solver::ColoringSolver;
use crate::solver::Outcome;

/// Default time given to each solver call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// State of a search.
#[derive(Debug)]
pub enum State {
    /// The window is the next one to submit.
    Searching(Bounds),
    Solved(Solution),
    Failed(SearchFailure),
}

/// Search driving a [ColoringSolver].
pub struct Search<'g, S> {
    graph: &'g Graph,
    solver: S,
    timeout: Duration,
    estimate: Estimate,
    state: State,
    windows: Vec<Bounds>,
}

impl<'g, S: ColoringSolver> Search<'g, S> {
    pub fn new(graph: &'g Graph, solver: S, timeout: Duration) -> Self {
        Self::with_estimate(graph, solver, timeout, Estimate::of(graph))
    }

    /// Create a search starting from the given bounds.
    pub fn with_estimate(
        graph: &'g Graph,
        solver: S,
        timeout: Duration,
        estimate: Estimate,
    ) -> Self {
        tracing::debug!(
            clique = ?estimate.clique,
            lower = estimate.lower,
            ceiling = estimate.ceiling,
            "initial bounds"
        );
        let state = if graph.node_count() == 0 {
            State::Solved(Solution {
                coloring: Coloring::new(0, vec![]),
                optimal: true,
            })
        } else {
            State::Searching(estimate.window())
        };
        Self {
            graph,
            solver,
            timeout,
            estimate,
            state,
            windows: vec![],
        }
    }

    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Windows submitted so far, in order.
    pub fn windows(&self) -> &[Bounds] {
        &self.windows
    }

    /// Submit the current window, if still searching.
    ///
    /// Return `true` if the search should continue.
    pub fn step(&mut self) -> bool {
        let window = match self.state {
            State::Searching(window) => window,
            _ => return false,
        };
        tracing::info!("looking for a coloring with colors in {window}");
        self.windows.push(window);
        self.state = match self.solver.submit(self.graph, window, self.timeout)
        {
            Outcome::Solved(coloring) => {
                tracing::info!("found a {}-coloring", coloring.num_colors());
                let optimal = coloring.num_colors() <= window.lower;
                State::Solved(Solution { coloring, optimal })
            }
            Outcome::Unsatisfiable if window.upper < self.estimate.ceiling => {
                tracing::info!("no coloring with colors in {window}");
                State::Searching(window.widen())
            }
            Outcome::Unsatisfiable => {
                State::Failed(SearchFailure::UnsatisfiableAtBound {
                    ceiling: self.estimate.ceiling,
                })
            }
            Outcome::TimedOut => State::Failed(SearchFailure::SolverTimeout {
                window,
                timeout: self.timeout,
            }),
            Outcome::Errored(error) => {
                State::Failed(SearchFailure::from_solver(window, error))
            }
        };
        matches!(self.state, State::Searching(_))
    }

    /// Search until a coloring is found or the search fails.
    pub fn run(mut self) -> Result<Solution, SearchFailure> {
        loop {
            match self.state {
                State::Searching(_) => {
                    self.step();
                }
                State::Solved(solution) => return Ok(solution),
                State::Failed(failure) => return Err(failure),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::error::FormatError;
    use crate::error::SolverError;

    /// Solver replaying canned outcomes.
    struct Scripted {
        outcomes: VecDeque<Outcome>,
        calls: Vec<(Bounds, Duration)>,
    }

    impl Scripted {
        fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
            Self {
                outcomes: outcomes.into_iter().collect(),
                calls: vec![],
            }
        }
    }

    impl ColoringSolver for Scripted {
        fn submit(&mut self, _: &Graph, bounds: Bounds, timeout: Duration) -> Outcome {
            self.calls.push((bounds, timeout));
            self.outcomes.pop_front().expect("no more scripted outcomes")
        }
    }

    /// Triangle 0-1-2 with a tail 2-3: lower bound 3, ceiling 4.
    fn graph() -> Graph {
        Graph::new(4, vec![(0, 1), (1, 2), (0, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn solved_at_first_window() {
        let graph = graph();
        let coloring = Coloring::new(3, vec![0, 1, 2, 0]);
        let mut solver = Scripted::new([Outcome::Solved(coloring.clone())]);
        let solution = Search::new(&graph, &mut solver, DEFAULT_TIMEOUT).run().unwrap();
        assert_eq!(solution, Solution { coloring, optimal: true });
        assert_eq!(solver.calls, vec![(Bounds::exactly(3), DEFAULT_TIMEOUT)]);
    }

    #[test]
    fn widens_after_unsat() {
        let graph = graph();
        let estimate = Estimate::with_clique_limit(&graph, 0);
        assert_eq!((estimate.lower, estimate.ceiling), (1, 4));
        let coloring = Coloring::new(3, vec![0, 1, 2, 0]);
        let solver = Scripted::new([
            Outcome::Unsatisfiable,
            Outcome::Unsatisfiable,
            Outcome::Solved(coloring.clone()),
        ]);
        let mut search = Search::with_estimate(&graph, solver, DEFAULT_TIMEOUT, estimate);
        while search.step() {}
        assert_eq!(
            search.windows(),
            &[Bounds::exactly(1), Bounds::exactly(2), Bounds::exactly(3)]
        );
        let State::Solved(solution) = search.state() else {
            panic!("search did not succeed");
        };
        assert!(solution.optimal);
        assert_eq!(solution.coloring, coloring);
    }

    #[test]
    fn unsat_up_to_the_ceiling() {
        let graph = graph();
        let solver = Scripted::new([Outcome::Unsatisfiable, Outcome::Unsatisfiable]);
        let mut search = Search::new(&graph, solver, DEFAULT_TIMEOUT);
        while search.step() {}
        assert_eq!(search.windows(), &[Bounds::exactly(3), Bounds::exactly(4)]);
        assert!(matches!(
            search.state(),
            State::Failed(SearchFailure::UnsatisfiableAtBound { ceiling: 4 })
        ));
        // stopped searches do not call the solver anymore
        assert!(!search.step());
        assert_eq!(search.windows().len(), 2);
    }

    #[test]
    fn timeout_stops_the_search() {
        let graph = graph();
        let timeout = Duration::from_millis(5);
        let solver = Scripted::new([Outcome::TimedOut]);
        let failure = Search::new(&graph, solver, timeout).run().unwrap_err();
        let SearchFailure::SolverTimeout { window, timeout: t } = failure else {
            panic!("expected a timeout");
        };
        assert_eq!(window, Bounds::exactly(3));
        assert_eq!(t, timeout);
    }

    #[test]
    fn process_error_stops_the_search() {
        let graph = graph();
        let error = SolverError::Wait(io::Error::other("gone"));
        let solver = Scripted::new([Outcome::Unsatisfiable, Outcome::Errored(error)]);
        let failure = Search::new(&graph, solver, DEFAULT_TIMEOUT).run().unwrap_err();
        assert!(matches!(
            failure,
            SearchFailure::SolverProcess { window, .. } if window == Bounds::exactly(4)
        ));
    }

    #[test]
    fn format_error_stops_the_search() {
        let graph = graph();
        let error = FormatError::LengthMismatch { expected: 4, found: 3 };
        let solver = Scripted::new([Outcome::Errored(error.into())]);
        let failure = Search::new(&graph, solver, DEFAULT_TIMEOUT).run().unwrap_err();
        assert!(matches!(
            failure,
            SearchFailure::OutputFormat {
                source: FormatError::LengthMismatch { expected: 4, found: 3 },
                ..
            }
        ));
    }

    #[test]
    fn empty_graph_needs_no_solver() {
        let graph = Graph::new(0, vec![]).unwrap();
        let mut solver = Scripted::new([]);
        let solution = Search::new(&graph, &mut solver, DEFAULT_TIMEOUT).run().unwrap();
        assert_eq!(solution.coloring.num_colors(), 0);
        assert!(solution.optimal);
        assert!(solver.calls.is_empty());
    }
}
