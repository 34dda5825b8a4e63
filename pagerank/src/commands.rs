use clap::{arg, command};
use pagerank_core::crawl::{DEFAULT_OUTPUT, DEFAULT_SEED_URL};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Ranking arguments shared by `rank` and the automatic ranking after `crawl`.
fn rank_arguments(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-n --"display" <COUNT>)
            .required(false)
            .help("Number of ranked entries to display")
            .value_parser(clap::value_parser!(usize))
            .default_value("30"),
    )
    .arg(
        arg!(-d --"damping-factor" <FACTOR>)
            .required(false)
            .help("Probability of following a link rather than jumping to a random page")
            .value_parser(clap::value_parser!(f64))
            .default_value("0.85"),
    )
    .arg(
        arg!(-c --"computation" <METHOD>)
            .required(false)
            .help("Computation method: iterative, algebraic or power")
            .default_value("iterative"),
    )
    .arg(
        arg!(--"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
    )
    .arg(
        arg!(--"matrix")
            .required(false)
            .help("Also print the link adjacency matrix")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(-r --"report" <PATH>)
            .required(false)
            .help("Save the ranked report to a file (default: display to screen)"),
    )
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagerank")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagerank")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Only log warnings and errors").required(false))
        .subcommand_required(true)
        .subcommand(rank_arguments(
            command!("crawl")
                .about(
                    "Crawl a site's links to a fixed depth and save the link graph. Shallow \
                crawls (level 2 or less) are ranked straight away.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The URL to start crawling from")
                        .default_value(DEFAULT_SEED_URL),
                )
                .arg(
                    arg!(-l --"level" <LEVEL>)
                        .required(false)
                        .help("Crawling recursion level; 1 records the seed page only")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("File to store the crawled link graph")
                        .default_value(DEFAULT_OUTPUT),
                )
                .arg(
                    arg!(-t --"timeout" <MILLISECONDS>)
                        .required(false)
                        .help("Per-request timeout in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"no-rank")
                        .required(false)
                        .help("Skip the automatic ranking after a shallow crawl")
                        .action(clap::ArgAction::SetTrue),
                ),
        ))
        .subcommand(rank_arguments(
            command!("rank")
                .about("Rank the pages of a saved link graph with PageRank")
                .arg(
                    arg!(-f --"file" <PATH>)
                        .required(false)
                        .help("File containing the crawled link graph")
                        .default_value(DEFAULT_OUTPUT),
                ),
        ))
}
