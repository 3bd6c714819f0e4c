//! Integration Tests for the Reference Vertex Programs
//!
//! PageRank is checked against the closed-form fixed point obtained by
//! Gaussian elimination; shortest paths against breadth-first search on
//! seeded random graphs.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use pregel::algorithms::{pagerank_graph, shortest_path_graph, PageRankVertex, DEFAULT_DAMPING};
use pregel::{GraphBuilder, Pregel, PregelConfig, Termination};

/// Solve `(I - d * M) r = (1 - d) / N` where `M[to][from] = 1 / outdeg(from)`
fn pagerank_fixed_point(n: usize, edges: &[(usize, usize)]) -> Vec<f64> {
    let mut out_degree = vec![0.0; n];
    for &(from, _) in edges {
        out_degree[from] += 1.0;
    }

    let mut a = vec![vec![0.0; n + 1]; n];
    for (i, row) in a.iter_mut().enumerate() {
        row[i] = 1.0;
        row[n] = (1.0 - DEFAULT_DAMPING) / n as f64;
    }
    for &(from, to) in edges {
        a[to][from] -= DEFAULT_DAMPING / out_degree[from];
    }

    // Gaussian elimination with partial pivoting
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap();
        a.swap(col, pivot);
        for row in 0..n {
            if row != col {
                let factor = a[row][col] / a[col][col];
                for k in col..=n {
                    a[row][k] -= factor * a[col][k];
                }
            }
        }
    }
    (0..n).map(|i| a[i][n] / a[i][i]).collect()
}

fn run_pagerank(n: usize, edges: &[(usize, usize)], iterations: usize, workers: usize) -> Vec<f64> {
    let vertices = pagerank_graph(n, edges, iterations).unwrap();
    let mut engine = Pregel::new(vertices, PregelConfig::default().with_workers(workers)).unwrap();
    let summary = engine.run().unwrap();
    assert!(summary.converged());
    assert_eq!(summary.supersteps, iterations + 1);
    engine.values().map(|(_, rank)| *rank).collect()
}

fn random_graph(n: usize, degree: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .flat_map(|from| {
            (0..degree)
                .map(|_| (from, rng.random_range(0..n)))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn bfs(n: usize, edges: &[(usize, usize)], source: usize) -> Vec<Option<f64>> {
    let mut adjacency = vec![Vec::new(); n];
    for &(from, to) in edges {
        adjacency[from].push(to);
    }
    let mut distance = vec![None; n];
    distance[source] = Some(0.0);
    let mut queue = VecDeque::from([source]);
    while let Some(v) = queue.pop_front() {
        let next = distance[v].map(|d: f64| d + 1.0);
        for &w in &adjacency[v] {
            if distance[w].is_none() {
                distance[w] = next;
                queue.push_back(w);
            }
        }
    }
    distance
}

// =============================================================================
// PageRank
// =============================================================================

#[test]
fn test_pagerank_three_cycle_is_uniform() {
    let ranks = run_pagerank(3, &[(0, 1), (1, 2), (2, 0)], 50, 3);
    for rank in ranks {
        assert!((rank - 1.0 / 3.0).abs() < 1e-6);
    }
}

#[test]
fn test_pagerank_matches_linear_solution() {
    // Strongly connected, no sinks, uneven degrees
    let edges = [
        (0, 1),
        (0, 2),
        (1, 2),
        (2, 0),
        (2, 3),
        (3, 0),
        (3, 4),
        (4, 0),
        (4, 1),
        (4, 3),
    ];
    let expected = pagerank_fixed_point(5, &edges);
    let ranks = run_pagerank(5, &edges, 200, 2);

    for (rank, want) in ranks.iter().zip(&expected) {
        assert!((rank - want).abs() < 1e-6, "{} vs {}", rank, want);
    }
    assert!((ranks.iter().sum::<f64>() - 1.0).abs() < 1e-6);
}

#[test]
fn test_pagerank_isolated_vertex_keeps_teleport_rank() {
    // Vertex 3 has neither in- nor out-edges
    let ranks = run_pagerank(4, &[(0, 1), (1, 2), (2, 0)], 40, 2);
    let teleport = (1.0 - DEFAULT_DAMPING) / 4.0;

    assert!(ranks.iter().all(|r| r.is_finite()));
    assert!((ranks[3] - teleport).abs() < 1e-12);
    assert!(ranks[..3].iter().all(|r| *r > teleport));
}

#[test]
fn test_pagerank_identical_across_worker_counts() {
    let edges = random_graph(200, 4, 11);
    let baseline = run_pagerank(200, &edges, 20, 1);
    for workers in [2, 3, 7, 16] {
        assert_eq!(run_pagerank(200, &edges, 20, workers), baseline);
    }
}

#[test]
fn test_pagerank_superstep_bound_truncates_iterations() {
    let vertices = pagerank_graph(3, &[(0, 1), (1, 2), (2, 0)], 100).unwrap();
    let config = PregelConfig::default().with_max_supersteps(10);
    let mut engine = Pregel::new(vertices, config).unwrap();

    let summary = engine.run().unwrap();
    assert_eq!(summary.termination, Termination::SuperstepLimit);
    assert_eq!(summary.supersteps, 10);
}

#[test]
fn test_pagerank_with_string_ids() {
    let program = PageRankVertex::new(2, 10);
    let mut engine = GraphBuilder::new()
        .vertex("left", program, program.initial_rank())
        .vertex("right", program, program.initial_rank())
        .edge("left", "right")
        .edge("right", "left")
        .into_pregel(PregelConfig::default())
        .unwrap();
    engine.run().unwrap();

    assert!((engine.value("left").unwrap() - 0.5).abs() < 1e-12);
}

// =============================================================================
// Shortest paths
// =============================================================================

#[test]
fn test_shortest_path_matches_bfs_on_random_graphs() {
    for seed in 0..10 {
        let n = 60;
        let edges = random_graph(n, 2, seed);
        let source = (seed as usize * 7) % n;

        let vertices = shortest_path_graph(n, &edges, source).unwrap();
        let mut engine = Pregel::new(vertices, PregelConfig::default().with_workers(4)).unwrap();
        let summary = engine.run().unwrap();

        assert!(summary.converged());
        let distances: Vec<Option<f64>> = engine.values().map(|(_, d)| *d).collect();
        assert_eq!(distances, bfs(n, &edges, source), "seed {}", seed);
    }
}

#[test]
fn test_shortest_path_superstep_count_tracks_eccentricity() {
    // Path of length 5: distances settle by superstep 5, everyone halts at 6
    let edges: Vec<(usize, usize)> = (0..5).map(|i| (i, i + 1)).collect();
    let vertices = shortest_path_graph(6, &edges, 0).unwrap();
    let mut engine = Pregel::new(vertices, PregelConfig::default()).unwrap();

    let summary = engine.run().unwrap();
    assert_eq!(summary.supersteps, 7);
    assert_eq!(engine.value(5_usize), Some(&Some(5.0)));
}
