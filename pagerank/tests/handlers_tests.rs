use pagerank::commands::command_argument_builder;
use pagerank::handlers::*;
use pagerank_core::rank::{ComputationMethod, RankOptions, execute_rank};
use pagerank_core::report::ReportFormat;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn parse(args: &[&str]) -> clap::ArgMatches {
    command_argument_builder()
        .try_get_matches_from(args)
        .unwrap()
}

fn sub_matches<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a clap::ArgMatches {
    matches.subcommand_matches(name).unwrap()
}

#[test]
fn test_crawl_defaults() {
    let matches = parse(&["pagerank", "crawl"]);
    let options = crawl_options_from(sub_matches(&matches, "crawl")).unwrap();

    assert_eq!(options.url, "http://www.nuk.edu.tw");
    assert_eq!(options.level, 1);
    assert_eq!(options.output, PathBuf::from("crawler-result.json"));
    assert_eq!(options.timeout.as_millis(), 1000);
}

#[test]
fn test_crawl_arguments() {
    let matches = parse(&[
        "pagerank", "crawl", "-u", "http://example.com/", "-l", "3", "-o", "out.json", "-t",
        "250",
    ]);
    let options = crawl_options_from(sub_matches(&matches, "crawl")).unwrap();

    assert_eq!(options.url, "http://example.com/");
    assert_eq!(options.level, 3);
    assert_eq!(options.output, PathBuf::from("out.json"));
    assert_eq!(options.timeout.as_millis(), 250);
}

#[test]
fn test_rank_defaults() {
    let matches = parse(&["pagerank", "rank"]);
    let rank = sub_matches(&matches, "rank");

    let options = rank_options_from(rank, PathBuf::from("g.json")).unwrap();
    assert_eq!(options.damping_factor, 0.85);
    assert_eq!(options.method, ComputationMethod::Iterative);

    let report = report_options_from(rank).unwrap();
    assert_eq!(report.display, 30);
    assert_eq!(report.format, ReportFormat::Text);
    assert!(!report.show_matrix);
    assert!(report.output.is_none());
}

#[test]
fn test_rank_arguments() {
    let matches = parse(&[
        "pagerank", "rank", "-n", "5", "-d", "0.5", "-c", "algebraic", "--format", "json",
        "--matrix",
    ]);
    let rank = sub_matches(&matches, "rank");

    let options = rank_options_from(rank, PathBuf::from("g.json")).unwrap();
    assert_eq!(options.damping_factor, 0.5);
    assert_eq!(options.method, ComputationMethod::Algebraic);

    let report = report_options_from(rank).unwrap();
    assert_eq!(report.display, 5);
    assert_eq!(report.format, ReportFormat::Json);
    assert!(report.show_matrix);
}

#[test]
fn test_unknown_computation_falls_back_to_iterative() {
    let matches = parse(&["pagerank", "rank", "-c", "quantum"]);
    let options = rank_options_from(sub_matches(&matches, "rank"), PathBuf::new()).unwrap();
    assert_eq!(options.method, ComputationMethod::Iterative);
}

#[test]
fn test_damping_factor_out_of_range() {
    let matches = parse(&["pagerank", "rank", "-d", "1.5"]);
    let result = rank_options_from(sub_matches(&matches, "rank"), PathBuf::new());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("between 0 and 1"));
}

#[test]
fn test_unknown_report_format_rejected_by_parser() {
    let result = command_argument_builder().try_get_matches_from(["pagerank", "rank", "--format", "pdf"]);
    assert!(result.is_err());
}

#[test]
fn test_subcommand_required() {
    let result = command_argument_builder().try_get_matches_from(["pagerank"]);
    assert!(result.is_err());
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/graph.json");
    assert!(expanded.ends_with("graph.json"));

    assert_eq!(expand_path("plain.json"), PathBuf::from("plain.json"));
}

#[test]
fn test_render_report_with_matrix() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("graph.json");
    fs::write(
        &path,
        r#"{"http://a.com": ["http://a.com/b"], "http://a.com/b": []}"#,
    )?;

    let report = execute_rank(&RankOptions {
        file: path,
        damping_factor: 0.85,
        method: ComputationMethod::Iterative,
    })?;

    let matches = parse(&["pagerank", "rank", "--matrix", "-n", "1"]);
    let options = report_options_from(sub_matches(&matches, "rank"))?;
    let rendered = render_report(&report, &options)?;

    assert!(rendered.starts_with("url count: 2\n"));
    assert!(rendered.contains("  1. "));
    assert!(!rendered.contains("  2. "));
    assert!(rendered.contains("   0 ## http://a.com\n"));
    assert!(rendered.contains("   1 .# http://a.com/b\n"));

    Ok(())
}
