use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

pub const COMMAND_NAME: &str = "cloud-gov-doc-search";
pub const COMMAND_ALIAS: &str = "cgds";
pub const OPTIONS_HELP: &str = "[-format <human|json>] [-url <uri>] <search-term>";

/// Long flags that are also accepted with a single dash (`-format json`).
const LEGACY_FLAGS: [&str; 3] = ["format", "url", "config"];

#[derive(Parser, Debug)]
#[command(
    name = "docsearch",
    version,
    about = "Search cloud.gov documentation and open a result in the browser"
)]
pub struct Cli {
    /// Configuration file (YAML/TOML/JSON). Defaults to ./docsearch.yaml when present.
    #[arg(long, global = true, env = "DOCSEARCH_CONFIG", value_name = "path")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search cloud.gov documentation for search-term
    #[command(
        name = COMMAND_NAME,
        visible_alias = COMMAND_ALIAS,
        override_usage = "docsearch cloud-gov-doc-search [-format <human|json>] [-url <uri>] <search-term>"
    )]
    Search(SearchArgs),
    /// Print the command metadata as one line of JSON
    Metadata,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Output format <human|json>
    #[arg(long, value_name = "human|json")]
    pub format: Option<String>,

    /// Search url; the term is appended to it verbatim
    #[arg(long, value_name = "uri")]
    pub url: Option<String>,

    #[arg(value_name = "search-term")]
    pub term: String,
}

/// Rewrite `-format`, `-url` and `-config` (and their `=value` forms) into the
/// double-dash spelling clap understands. Everything after `--` is left alone.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || passthrough {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                passthrough = true;
                return arg;
            }
            let is_legacy = s
                .strip_prefix('-')
                .filter(|rest| !rest.starts_with('-'))
                .map(|rest| rest.split_once('=').map_or(rest, |(name, _)| name))
                .is_some_and(|name| LEGACY_FLAGS.contains(&name));
            if is_legacy {
                OsString::from(format!("-{s}"))
            } else {
                arg
            }
        })
        .collect()
}
