use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use docsearch_common::observability::{LogConfig, LogFormat, init_logging};
use docsearch_common::{DocSearchError, FetchError, FormatError, OutputFormat, Result, SearchQuery};
use docsearch_config::{DocSearchConfig, DocSearchConfigLoader};
use docsearch_http::HttpClient;
use docsearch_web::{ResultExtractor, SearchClient};

use cli::{Cli, Command, SearchArgs};
use launch::{LaunchTable, SystemLauncher};
use pipeline::Outcome;

mod cli;
mod launch;
mod metadata;
mod pipeline;
mod present;
mod select;

const DEFAULT_CONFIG_FILE: &str = "docsearch.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse_from(cli::normalize_legacy_flags(std::env::args_os()));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(report(&err, &mut io::stderr().lock())),
    }
}

/// Describe `err` on `out` and return the process exit code for it.
fn report<W: Write>(err: &DocSearchError, out: &mut W) -> u8 {
    tracing::error!(error = %err, "docsearch.failed");
    // Nothing sensible is left to do if stderr itself is gone.
    let _ = writeln!(out, "Error: {err}");
    if matches!(err, DocSearchError::Format(FormatError::Unknown(_))) {
        let _ = writeln!(out, "Usage: docsearch {} {}", cli::COMMAND_NAME, cli::OPTIONS_HELP);
    }
    err.exit_code()
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;

    let log_config = LogConfig {
        log_dir: cfg.logging.dir.as_ref().map(PathBuf::from),
        emit_stderr: cfg.logging.stderr,
        format: if cfg.logging.json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    };
    // Logging is best effort; a read-only home directory must not stop a search.
    if let Err(e) = init_logging(log_config) {
        eprintln!("warning: file logging disabled: {e:#}");
    }

    match cli.command {
        Command::Metadata => {
            metadata::print_metadata(&mut io::stdout().lock())?;
            Ok(())
        }
        Command::Search(args) => search(args, &cfg).await,
    }
}

fn load_config(explicit: Option<&Path>) -> Result<DocSearchConfig> {
    let loader = match explicit {
        Some(path) => DocSearchConfigLoader::new().with_file(path),
        None => DocSearchConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    loader
        .load()
        .map_err(|e| DocSearchError::Config(e.to_string()))
}

/// Flags win over config. The format is parsed here, before any request.
fn resolve_query(args: &SearchArgs, cfg: &DocSearchConfig) -> Result<SearchQuery> {
    let format: OutputFormat = args.format.as_deref().unwrap_or(&cfg.format).parse()?;
    let endpoint = args.url.as_deref().unwrap_or(&cfg.endpoint);
    Ok(SearchQuery::new(args.term.as_str(), endpoint, format))
}

async fn search(args: SearchArgs, cfg: &DocSearchConfig) -> Result<()> {
    let query = resolve_query(&args, cfg)?;

    let extractor = ResultExtractor::new(&cfg.selectors.result, &cfg.selectors.link)
        .map_err(|e| DocSearchError::Config(e.to_string()))?;
    let http = HttpClient::new()
        .map_err(|e| FetchError::Client(e.to_string()))?
        .with_timeout(Duration::from_secs(cfg.timeout_secs));
    let client = SearchClient::new(http, query.endpoint.clone(), extractor);
    let launcher = SystemLauncher::new(
        LaunchTable::default().with_overrides(cfg.launchers.clone()),
    );

    tracing::info!(
        url = %query.request_url(),
        format = %query.format,
        "docsearch.invocation"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = pipeline::run(
        &query,
        &client,
        &mut stdin.lock(),
        &mut stdout.lock(),
        &launcher,
    )
    .await?;

    match outcome {
        Outcome::Rendered { count } => tracing::info!(count, "docsearch.done"),
        Outcome::Selected(selection) => tracing::info!(?selection, "docsearch.done"),
    }
    Ok(())
}
