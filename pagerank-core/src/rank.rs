//! PageRank over a crawled link graph.
//!
//! The transition matrix is built over the graph's keys in their stored
//! order. Entry `(i, j)` starts at 1 when page `i` links to page `j` or when
//! `i == j`, and each column is then divided by its count of 1-entries. Note
//! that this scales by the number of pages linking *into* `j`, not by the
//! out-degree of the linking page as textbook PageRank does.

use crate::snapshot::SnapshotStore;
use pagerank_crawler::LinkGraph;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Iterations stop once successive vectors differ by less than this (L1).
pub const CONVERGENCE_THRESHOLD: f64 = 1e-3;

pub const MAX_ITERATIONS: usize = 100;

pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;

pub type Matrix = Vec<Vec<f64>>;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Damping factor must be between 0 and 1, got {0}")]
    InvalidDampingFactor(f64),

    #[error("The rank system is singular and has no unique solution")]
    SingularMatrix,
}

pub type Result<T> = std::result::Result<T, RankError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputationMethod {
    /// Damped update iterated to a fixed point.
    Iterative,
    /// Direct solve of the damped linear system.
    Algebraic,
    /// Power method on the dense Google matrix, L2-normalized each step.
    Power,
}

impl ComputationMethod {
    /// Unknown names fall back to [`ComputationMethod::Iterative`].
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "algebraic" => ComputationMethod::Algebraic,
            "power" => ComputationMethod::Power,
            _ => ComputationMethod::Iterative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComputationMethod::Iterative => "iterative",
            ComputationMethod::Algebraic => "algebraic",
            ComputationMethod::Power => "power",
        }
    }
}

/// One ranked page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub url: String,
    pub score: f64,
    /// Pages linking to this one, itself included.
    pub links_in: usize,
    /// Pages this one links to among the ranked pages, itself included.
    pub links_out: usize,
}

#[derive(Debug, Clone)]
pub struct RankReport {
    /// Entries sorted by descending score; ties keep graph order.
    pub entries: Vec<RankEntry>,
    /// Graph keys in matrix order.
    pub nodes: Vec<String>,
    /// `relation[i][j]` is true when the matrix has an edge from `i` to `j`.
    pub relation: Vec<Vec<bool>>,
    pub method: ComputationMethod,
    pub elapsed: Duration,
}

impl RankReport {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Builds the column-normalized transition matrix over `graph`'s keys.
pub fn build_transition_matrix(graph: &LinkGraph) -> (Vec<String>, Matrix) {
    let nodes: Vec<String> = graph.keys().cloned().collect();
    let n = nodes.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for (i, source) in nodes.iter().enumerate() {
        let links = &graph[source.as_str()];
        for (j, target) in nodes.iter().enumerate() {
            if i == j || links.contains(target) {
                matrix[i][j] = 1.0;
            }
        }
    }

    for j in 0..n {
        let count = (0..n).filter(|&i| matrix[i][j] == 1.0).count();
        if count > 0 {
            for row in matrix.iter_mut() {
                row[j] /= count as f64;
            }
        }
    }

    (nodes, matrix)
}

/// Uniform starting vector `1/N`.
pub fn initial_rank(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

fn multiply(matrix: &Matrix, vector: &[f64]) -> Vec<f64> {
    matrix
        .iter()
        .map(|row| row.iter().zip(vector).map(|(m, r)| m * r).sum())
        .collect()
}

fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// Applies `next = d * (M x R) + (1 - d) / N` until successive vectors are
/// within [`CONVERGENCE_THRESHOLD`] or [`MAX_ITERATIONS`] is reached.
///
/// On convergence the vector that produced the small step is returned; at
/// the iteration cap the last computed vector is returned unchecked.
pub fn power_iterate(rank: Vec<f64>, matrix: &Matrix, damping: f64) -> Vec<f64> {
    let n = rank.len();
    if n == 0 {
        return rank;
    }
    let teleport = (1.0 - damping) / n as f64;

    let mut rank = rank;
    for iteration in 0..MAX_ITERATIONS {
        let next: Vec<f64> = multiply(matrix, &rank)
            .into_iter()
            .map(|v| damping * v + teleport)
            .collect();

        if l1_distance(&next, &rank) < CONVERGENCE_THRESHOLD {
            debug!("Converged after {} iterations", iteration + 1);
            return rank;
        }
        rank = next;
    }

    debug!("Stopped at the {} iteration cap", MAX_ITERATIONS);
    rank
}

/// Solves `(I - d * M) R = (1 - d) / N` directly.
pub fn solve_algebraic(matrix: &Matrix, damping: f64) -> Result<Vec<f64>> {
    let n = matrix.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let rhs = (1.0 - damping) / n as f64;
    // Augmented system [I - dM | rhs]
    let mut system: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut augmented: Vec<f64> = row
                .iter()
                .enumerate()
                .map(|(j, m)| if i == j { 1.0 - damping * m } else { -damping * m })
                .collect();
            augmented.push(rhs);
            augmented
        })
        .collect();

    // Gauss-Jordan elimination with partial pivoting
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| {
                system[a][col]
                    .abs()
                    .partial_cmp(&system[b][col].abs())
                    .unwrap_or(Ordering::Equal)
            })
            .unwrap_or(col);
        if system[pivot][col].abs() < 1e-12 {
            return Err(RankError::SingularMatrix);
        }
        system.swap(col, pivot);

        let divisor = system[col][col];
        for value in system[col].iter_mut() {
            *value /= divisor;
        }

        let pivot_row = system[col].clone();
        for (row_index, row) in system.iter_mut().enumerate() {
            if row_index == col {
                continue;
            }
            let factor = row[col];
            if factor != 0.0 {
                for (value, p) in row.iter_mut().zip(&pivot_row) {
                    *value -= factor * p;
                }
            }
        }
    }

    Ok(system.into_iter().map(|row| row[n]).collect())
}

/// Iterates `R = A x R / |A x R|` with `A = d * M + (1 - d) / N`.
pub fn power_method(rank: Vec<f64>, matrix: &Matrix, damping: f64) -> Vec<f64> {
    let n = rank.len();
    if n == 0 {
        return rank;
    }
    let teleport = (1.0 - damping) / n as f64;
    let google: Matrix = matrix
        .iter()
        .map(|row| row.iter().map(|m| damping * m + teleport).collect())
        .collect();

    let mut rank = rank;
    for _ in 0..MAX_ITERATIONS {
        let mut next = multiply(&google, &rank);
        let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in next.iter_mut() {
                *v /= norm;
            }
        }

        if l1_distance(&next, &rank) < CONVERGENCE_THRESHOLD {
            return rank;
        }
        rank = next;
    }
    rank
}

/// Rejects damping factors outside `[0, 1]`.
pub fn validate_damping_factor(damping: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&damping) {
        Ok(damping)
    } else {
        Err(RankError::InvalidDampingFactor(damping))
    }
}

/// Ranks every page of `graph` and sorts them by descending score.
pub fn rank(graph: &LinkGraph, damping: f64, method: ComputationMethod) -> Result<RankReport> {
    validate_damping_factor(damping)?;

    let (nodes, matrix) = build_transition_matrix(graph);
    let relation: Vec<Vec<bool>> = matrix
        .iter()
        .map(|row| row.iter().map(|&m| m > 0.0).collect())
        .collect();

    let start = Instant::now();
    let scores = match method {
        ComputationMethod::Iterative => power_iterate(initial_rank(nodes.len()), &matrix, damping),
        ComputationMethod::Algebraic => solve_algebraic(&matrix, damping)?,
        ComputationMethod::Power => power_method(initial_rank(nodes.len()), &matrix, damping),
    };
    let elapsed = start.elapsed();

    let mut entries: Vec<RankEntry> = nodes
        .iter()
        .enumerate()
        .map(|(i, url)| RankEntry {
            url: url.clone(),
            score: scores[i],
            links_in: relation.iter().filter(|row| row[i]).count(),
            links_out: relation[i].iter().filter(|&&edge| edge).count(),
        })
        .collect();

    // Stable, so equal scores keep graph order
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    info!(
        "Ranked {} pages with the {} method in {} ms",
        nodes.len(),
        method.as_str(),
        elapsed.as_millis()
    );

    Ok(RankReport {
        entries,
        nodes,
        relation,
        method,
        elapsed,
    })
}

/// Options for ranking a saved snapshot
#[derive(Debug, Clone)]
pub struct RankOptions {
    pub file: PathBuf,
    pub damping_factor: f64,
    pub method: ComputationMethod,
}

/// Loads the snapshot at `options.file` and ranks it.
pub fn execute_rank(options: &RankOptions) -> anyhow::Result<RankReport> {
    use anyhow::Context;

    let graph = SnapshotStore::new(&options.file)
        .load()
        .with_context(|| format!("Failed to load graph from {}", options.file.display()))?;

    let report = rank(&graph, options.damping_factor, options.method)?;
    Ok(report)
}
