mod cli;
mod color;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, Command};
use leetfetch_core::cache::Cache;
use leetfetch_core::catalog::CatalogEntry;
use leetfetch_core::render;
use leetfetch_core::resolver::{self, Resolution};
use leetfetch_core::settings::{SESSION_ENV, Settings};
use leetfetch_core::source::ProblemSource;
use leetfetch_core::transport::HttpTransport;

/// Outcome of a CLI run: the report for stdout and the process exit status.
///
/// Handled failures (not found, ambiguous query) still produce a report; the
/// status tells the shell about them.
pub struct CliOutput {
    pub report: String,
    pub status: i32,
}

impl CliOutput {
    fn success(report: String) -> Self {
        Self { report, status: 0 }
    }

    fn failure(report: String) -> Self {
        Self { report, status: 1 }
    }
}

/// Run the CLI with the given arguments and return the outcome.
///
/// # Arguments
/// * `args` - Command line arguments (excluding program name)
///
/// # Returns
/// * `Ok(CliOutput)` - Report for stdout plus the exit status
/// * `Err(String)` - A single descriptive error line (stderr)
pub fn run_cli(args: &[&str]) -> Result<CliOutput, String> {
    match run_cli_impl(args) {
        Ok(output) => Ok(output),
        Err(e) => Err(e.to_string()),
    }
}

fn run_cli_impl(args: &[&str]) -> anyhow::Result<CliOutput> {
    let parsed = match Cli::try_parse_from(std::iter::once("leetfetch").chain(args.iter().copied()))
    {
        Ok(cli) => cli,
        Err(e) => {
            // Handle --help and --version as successful outputs
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                return Ok(CliOutput::success(e.to_string()));
            }
            return Err(e.into());
        }
    };
    parsed.color.apply();

    let settings = Settings::from_env();
    let cache = Cache::open(&settings.cache_dir)?;
    let transport = HttpTransport::new(&settings);
    let source = ProblemSource::new(&transport, &cache, &settings);

    match parsed.command {
        Command::Search { query, limit } => {
            let catalog = fetch_catalog(&source)?;
            let matches = resolver::find_matches(&catalog, &query);
            Ok(CliOutput::success(with_newline(render::search_results(
                &matches, limit,
            ))))
        }
        Command::Get { query, limit } => {
            let catalog = fetch_catalog(&source)?;
            match resolver::resolve(&query, &catalog) {
                Resolution::Slug(slug) => {
                    let detail = source
                        .fetch_detail(&slug)
                        .map_err(|e| anyhow::anyhow!("Failed to fetch problem details: {e}"))?;
                    let mut report = String::new();
                    if detail.paid_only && detail.content.as_deref().unwrap_or("").is_empty() {
                        report.push_str(&format!(
                            "{}\n",
                            format!("Paid-only problem. Set {SESSION_ENV} to access full content.")
                                .red()
                        ));
                    }
                    report.push_str(&render::problem_detail(
                        &detail,
                        &settings.problem_url(&detail.slug),
                    ));
                    report.push('\n');
                    Ok(CliOutput::success(report))
                }
                Resolution::Ambiguous(matches) => Ok(ambiguous_report(&matches, limit)),
                Resolution::NotFound => Ok(not_found_report()),
            }
        }
        Command::Open { query, limit } => {
            let catalog = fetch_catalog(&source)?;
            match resolver::resolve(&query, &catalog) {
                Resolution::Slug(slug) => {
                    let url = settings.problem_url(&slug);
                    webbrowser::open(&url)
                        .with_context(|| format!("failed to open a browser for {url}"))?;
                    Ok(CliOutput::success(with_newline(url.blue().to_string())))
                }
                Resolution::Ambiguous(matches) => Ok(ambiguous_report(&matches, limit)),
                Resolution::NotFound => Ok(not_found_report()),
            }
        }
    }
}

fn fetch_catalog(source: &ProblemSource<'_>) -> anyhow::Result<Vec<CatalogEntry>> {
    source
        .fetch_catalog()
        .map_err(|e| anyhow::anyhow!("Failed to fetch problem list: {e}"))
}

fn ambiguous_report(matches: &[CatalogEntry], limit: usize) -> CliOutput {
    let refs: Vec<&CatalogEntry> = matches.iter().collect();
    let mut report = with_newline(render::search_results(&refs, limit));
    report.push_str(&format!(
        "{}\n",
        "Multiple matches. Be more specific or pass an id.".dimmed()
    ));
    CliOutput::failure(report)
}

fn not_found_report() -> CliOutput {
    CliOutput::failure(with_newline("Problem not found.".red().to_string()))
}

fn with_newline(mut report: String) -> String {
    if !report.ends_with('\n') {
        report.push('\n');
    }
    report
}
