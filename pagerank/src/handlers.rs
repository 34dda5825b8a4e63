use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use pagerank_core::crawl::{
    CrawlOptions, execute_crawl, generate_crawl_summary, should_auto_rank,
};
use pagerank_core::rank::{
    ComputationMethod, RankOptions, RankReport, execute_rank, validate_damping_factor,
};
use pagerank_core::report::{
    ReportFormat, generate_json_report, generate_text_report, render_relation_matrix,
    save_report,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// How the ranked report is rendered and where it goes
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub display: usize,
    pub format: ReportFormat,
    pub show_matrix: bool,
    pub output: Option<PathBuf>,
}

/// Expands a leading `~` in a user supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Reads a required argument that clap fills from its default value.
fn required_arg<'a, T: Clone + Send + Sync + 'static>(
    matches: &'a ArgMatches,
    name: &str,
) -> Result<&'a T> {
    matches
        .get_one::<T>(name)
        .with_context(|| format!("Missing value for --{}", name))
}

/// Builds rank options for the graph stored at `file`.
pub fn rank_options_from(matches: &ArgMatches, file: PathBuf) -> Result<RankOptions> {
    let damping_factor = *required_arg::<f64>(matches, "damping-factor")?;
    let damping_factor = validate_damping_factor(damping_factor)?;

    let method = ComputationMethod::from_str(required_arg::<String>(matches, "computation")?);

    Ok(RankOptions {
        file,
        damping_factor,
        method,
    })
}

pub fn report_options_from(matches: &ArgMatches) -> Result<ReportOptions> {
    let format_name = required_arg::<String>(matches, "format")?;
    let format = ReportFormat::from_str(format_name)
        .with_context(|| format!("Unknown report format '{}'", format_name))?;

    Ok(ReportOptions {
        display: *required_arg::<usize>(matches, "display")?,
        format,
        show_matrix: matches.get_flag("matrix"),
        output: matches.get_one::<String>("report").map(|p| expand_path(p)),
    })
}

pub fn crawl_options_from(matches: &ArgMatches) -> Result<CrawlOptions> {
    Ok(CrawlOptions {
        url: required_arg::<String>(matches, "url")?.clone(),
        level: *required_arg::<usize>(matches, "level")?,
        output: expand_path(required_arg::<String>(matches, "output")?),
        timeout: Duration::from_millis(*required_arg::<u64>(matches, "timeout")?),
        show_progress_bars: true,
    })
}

/// Renders the ranked report in the requested format.
pub fn render_report(report: &RankReport, options: &ReportOptions) -> Result<String> {
    let mut rendered = match options.format {
        ReportFormat::Text => generate_text_report(report, options.display),
        ReportFormat::Json => {
            generate_json_report(report, options.display).context("Failed to render JSON")?
        }
    };

    if options.show_matrix {
        rendered.push('\n');
        rendered.push_str(&render_relation_matrix(report));
    }

    Ok(rendered)
}

fn emit_report(report: &RankReport, options: &ReportOptions) -> Result<()> {
    let rendered = render_report(report, options)?;

    match options.output {
        Some(ref path) => {
            save_report(&rendered, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

pub async fn handle_crawl(sub_matches: &ArgMatches) -> Result<()> {
    let options = crawl_options_from(sub_matches)?;
    let level = options.level;
    let output = options.output.clone();

    // Parse rank options up front so bad flags fail before the crawl starts
    let rank_options = rank_options_from(sub_matches, output.clone())?;
    let report_options = report_options_from(sub_matches)?;

    println!(
        "\n{} Crawling {}",
        "→".blue(),
        options.url.bright_white()
    );
    println!("Level: {}", level);
    println!("Output: {}\n", output.display());

    let outcome = execute_crawl(options).await?;

    println!("\n{} Crawl complete!\n", "✓".green().bold());
    print!("{}", generate_crawl_summary(&outcome, &output));

    if sub_matches.get_flag("no-rank") {
        return Ok(());
    }
    if !should_auto_rank(level) {
        println!(
            "\n{} Level {} is too deep to rank automatically; run `pagerank rank -f {}`",
            "ℹ".blue(),
            level,
            output.display()
        );
        return Ok(());
    }

    println!();
    debug!("Ranking {} crawled pages", outcome.graph.len());
    let report = execute_rank(&rank_options)?;
    emit_report(&report, &report_options)
}

pub fn handle_rank(sub_matches: &ArgMatches) -> Result<()> {
    let file = expand_path(required_arg::<String>(sub_matches, "file")?);
    let rank_options = rank_options_from(sub_matches, file)?;
    let report_options = report_options_from(sub_matches)?;

    info!("Ranking graph from {}", rank_options.file.display());
    let report = execute_rank(&rank_options)?;
    emit_report(&report, &report_options)
}
