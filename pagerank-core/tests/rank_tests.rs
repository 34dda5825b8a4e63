// Tests for ranking saved snapshots

use pagerank_core::rank::{
    ComputationMethod, DEFAULT_DAMPING_FACTOR, RankOptions, build_transition_matrix,
    execute_rank, rank,
};
use pagerank_core::snapshot::SnapshotStore;
use pagerank_crawler::LinkGraph;
use std::fs;
use tempfile::TempDir;

fn graph(edges: &[(&str, &[&str])]) -> LinkGraph {
    edges
        .iter()
        .map(|(url, links)| {
            (
                url.to_string(),
                links.iter().map(|l| l.to_string()).collect(),
            )
        })
        .collect()
}

fn site_graph() -> LinkGraph {
    graph(&[
        (
            "http://s.com",
            &["http://x.com", "http://s.com/a", "http://s.com/b"],
        ),
        ("http://x.com", &[]),
        ("http://s.com/a", &["http://s.com/b", "http://s.com/c"]),
        ("http://s.com/b", &["http://s.com"]),
    ])
}

// ============================================================================
// Transition Matrix Tests
// ============================================================================

#[test]
fn test_matrix_columns_sum_to_one() {
    let (_, m) = build_transition_matrix(&site_graph());
    for j in 0..m.len() {
        let column_sum: f64 = m.iter().map(|row| row[j]).sum();
        assert!((column_sum - 1.0).abs() < 1e-12, "column {} sums to {}", j, column_sum);
    }
}

#[test]
fn test_matrix_uses_graph_key_order() {
    let (nodes, _) = build_transition_matrix(&site_graph());
    assert_eq!(
        nodes,
        vec!["http://s.com", "http://x.com", "http://s.com/a", "http://s.com/b"]
    );
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[test]
fn test_every_method_ranks_every_page() {
    for method in [
        ComputationMethod::Iterative,
        ComputationMethod::Algebraic,
        ComputationMethod::Power,
    ] {
        let report = rank(&site_graph(), DEFAULT_DAMPING_FACTOR, method).unwrap();
        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.method, method);
        assert!(report.entries.iter().all(|e| e.score > 0.0));
        for pair in report.entries.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}

#[test]
fn test_iterative_and_algebraic_agree_on_order() {
    let iterative = rank(&site_graph(), 0.85, ComputationMethod::Iterative).unwrap();
    let algebraic = rank(&site_graph(), 0.85, ComputationMethod::Algebraic).unwrap();

    for (a, b) in iterative.entries.iter().zip(&algebraic.entries) {
        assert!((a.score - b.score).abs() < 1e-2);
    }
}

#[test]
fn test_zero_damping_gives_uniform_scores() {
    let report = rank(&site_graph(), 0.0, ComputationMethod::Iterative).unwrap();
    for entry in &report.entries {
        assert!((entry.score - 0.25).abs() < 1e-12);
    }
    // All tied, so graph order is kept.
    let urls: Vec<&str> = report.entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["http://s.com", "http://x.com", "http://s.com/a", "http://s.com/b"]
    );
}

#[test]
fn test_relation_counts() {
    let report = rank(&site_graph(), 0.85, ComputationMethod::Iterative).unwrap();
    let entry = |url: &str| report.entries.iter().find(|e| e.url == url).unwrap().clone();

    // s.com links to x, a, b and itself; b links back to it.
    let seed = entry("http://s.com");
    assert_eq!(seed.links_out, 4);
    assert_eq!(seed.links_in, 2);

    // b is linked from s.com and a; c is not a key and does not count.
    let b = entry("http://s.com/b");
    assert_eq!(b.links_in, 3);
    assert_eq!(b.links_out, 2);

    let a = entry("http://s.com/a");
    assert_eq!(a.links_out, 2);
}

// ============================================================================
// Snapshot Ranking Tests
// ============================================================================

#[test]
fn test_execute_rank_loads_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("graph.json");
    SnapshotStore::new(&path).save(&site_graph()).unwrap();

    let options = RankOptions {
        file: path,
        damping_factor: 0.85,
        method: ComputationMethod::Iterative,
    };
    let report = execute_rank(&options).unwrap();

    assert_eq!(report.node_count(), 4);
}

#[test]
fn test_execute_rank_missing_snapshot_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let options = RankOptions {
        file: temp_dir.path().join("absent.json"),
        damping_factor: 0.85,
        method: ComputationMethod::Iterative,
    };

    let error = execute_rank(&options).unwrap_err();
    assert!(format!("{:#}", error).contains("absent.json"));
}

#[test]
fn test_execute_rank_corrupt_snapshot_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("graph.json");
    fs::write(&path, "{\"http://a.com\": 3}").unwrap();

    let options = RankOptions {
        file: path,
        damping_factor: 0.85,
        method: ComputationMethod::Iterative,
    };
    assert!(execute_rank(&options).is_err());
}
