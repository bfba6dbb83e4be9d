//! Search driven by an exhaustive in-process solver.

use std::time::Duration;

use itertools::Itertools;
use mzn_coloring::bounds::Bounds;
use mzn_coloring::bounds::Estimate;
use mzn_coloring::coloring::Coloring;
use mzn_coloring::graph::Graph;
use mzn_coloring::search::Search;
use mzn_coloring::search::State;
use mzn_coloring::solver::ColoringSolver;
use mzn_coloring::solver::Outcome;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const TIMEOUT: Duration = Duration::from_secs(1);

/// Solver trying every assignment, for small graphs only.
#[derive(Default)]
struct Exhaustive {
    windows: Vec<Bounds>,
}

fn color_with(graph: &Graph, k: u32, colors: &mut Vec<u32>) -> bool {
    let node = colors.len();
    if node == graph.node_count() {
        return true;
    }
    for color in 0..k {
        if graph
            .neighbors(node)
            .filter(|&n| n < node)
            .all(|n| colors[n] != color)
        {
            colors.push(color);
            if color_with(graph, k, colors) {
                return true;
            }
            colors.pop();
        }
    }
    false
}

fn chromatic_number(graph: &Graph) -> u32 {
    (0..)
        .find(|&k| color_with(graph, k, &mut vec![]))
        .unwrap()
}

impl ColoringSolver for Exhaustive {
    fn submit(&mut self, graph: &Graph, bounds: Bounds, _: Duration) -> Outcome {
        self.windows.push(bounds);
        for k in 1..=bounds.upper {
            let mut colors = vec![];
            if color_with(graph, k, &mut colors) {
                return Outcome::Solved(Coloring::new(k.max(bounds.lower), colors));
            }
        }
        Outcome::Unsatisfiable
    }
}

fn random_graph(nodes: usize, density: f64, seed: u64) -> Graph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let edges = (0..nodes)
        .tuple_combinations()
        .filter(|_| rng.random_bool(density))
        .collect();
    Graph::new(nodes, edges).unwrap()
}

#[test]
fn edgeless_graph_uses_one_color() {
    let graph = Graph::new(6, vec![]).unwrap();
    let solution = Search::new(&graph, Exhaustive::default(), TIMEOUT).run().unwrap();
    assert_eq!(solution.coloring.num_colors(), 1);
    assert_eq!(solution.coloring.colors(), &[0; 6]);
    assert!(solution.optimal);
}

#[test]
fn complete_graphs_need_one_color_per_node() {
    for k in 1..=6 {
        let graph = Graph::complete(k);
        let solution = Search::new(&graph, Exhaustive::default(), TIMEOUT).run().unwrap();
        assert_eq!(solution.coloring.num_colors(), k as u32);
        assert_eq!(solution.coloring.distinct_colors(), k);
        assert!(solution.optimal);
        solution.coloring.check(&graph).unwrap();
    }
}

#[test]
fn windows_grow_one_color_at_a_time() {
    for seed in 0..20 {
        let graph = random_graph(8, 0.5, seed);
        // no clique: start from a single color to exercise the widening
        let estimate = Estimate::with_clique_limit(&graph, 0);
        let max_iterations = estimate.max_iterations() as usize;
        let mut solver = Exhaustive::default();
        let mut search = Search::with_estimate(&graph, &mut solver, TIMEOUT, estimate);
        while search.step() {}

        let windows = search.windows().to_vec();
        assert!(!windows.is_empty());
        assert!(windows.len() <= max_iterations, "seed {seed}");
        assert_eq!(windows[0], Bounds::exactly(1));
        for (previous, next) in windows.iter().tuple_windows() {
            assert_eq!(next.lower, previous.lower + 1);
            assert_eq!(next.upper, previous.upper + 1);
        }

        let State::Solved(solution) = search.state() else {
            panic!("seed {seed}: no coloring found");
        };
        solution.coloring.check(&graph).unwrap();
        assert_eq!(solution.coloring.num_colors(), chromatic_number(&graph));
        assert!(solution.optimal);
        assert_eq!(windows.len() as u32, chromatic_number(&graph));
    }
}

#[test]
fn clique_bound_saves_solver_calls() {
    for seed in 0..20 {
        let graph = random_graph(9, 0.6, seed);
        let estimate = Estimate::of(&graph);
        let lower = estimate.lower;
        let mut solver = Exhaustive::default();
        let solution = Search::new(&graph, &mut solver, TIMEOUT).run().unwrap();
        let chromatic = chromatic_number(&graph);
        assert!(lower <= chromatic);
        assert_eq!(solution.coloring.num_colors(), chromatic);
        assert_eq!(solver.windows.len() as u32, chromatic - lower + 1);
    }
}

/// Solver never finding anything.
struct Refusing(usize);

impl ColoringSolver for Refusing {
    fn submit(&mut self, _: &Graph, _: Bounds, _: Duration) -> Outcome {
        self.0 += 1;
        Outcome::Unsatisfiable
    }
}

#[test]
fn search_always_terminates() {
    for seed in 0..10 {
        let graph = random_graph(12, 0.3, seed);
        let estimate = Estimate::of(&graph);
        let expected_calls = estimate.max_iterations() as usize;
        let mut solver = Refusing(0);
        let failure = Search::new(&graph, &mut solver, TIMEOUT).run().unwrap_err();
        assert_eq!(
            failure.to_string(),
            format!("no coloring found with up to {} colors", estimate.ceiling)
        );
        assert_eq!(solver.0, expected_calls);
    }
}
