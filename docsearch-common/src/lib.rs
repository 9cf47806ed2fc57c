//! Common types and utilities shared across docsearch crates.
//!
//! This crate defines the search data model, the error taxonomy, and the
//! observability helpers used throughout the docsearch workspace. It is
//! intentionally lightweight so that every crate can depend on it.
//!
//! # Overview
//!
//! - [`SearchResult`]: One extracted (link, description) pair
//! - [`SearchQuery`]: The per-invocation query built from CLI and config
//! - [`OutputFormat`]: How results are rendered (`human` or `json`)
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`DocSearchError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use docsearch_common::{OutputFormat, SearchQuery};
//!
//! let query = SearchQuery::new("buildpacks", "https://search.example/search?query=", OutputFormat::Human);
//! assert_eq!(query.request_url(), "https://search.example/search?query=buildpacks");
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod observability;

/// A single result extracted from a search-results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The link target exactly as it appeared in the `href` attribute.
    pub url: String,
    /// Whitespace-collapsed text content of the link. May be empty.
    pub description: String,
}

impl SearchResult {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
        }
    }
}

/// Preferred output format for rendered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `index | url | description` lines followed by an interactive prompt.
    #[default]
    Human,
    /// One line of JSON, non-interactive.
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Human => "human",
            OutputFormat::Json => "json",
        }
    }

    /// Only human output is followed by the selection prompt.
    pub fn is_interactive(&self) -> bool {
        matches!(self, OutputFormat::Human)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(FormatError::Unknown(other.to_string())),
        }
    }
}

/// Everything one invocation needs to know about what to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    /// Base URL carrying all fixed query parameters, ending in the delimiter
    /// the term is appended to (e.g. `...&query=`).
    pub endpoint: String,
    pub format: OutputFormat,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, endpoint: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            term: term.into(),
            endpoint: endpoint.into(),
            format,
        }
    }

    pub fn request_url(&self) -> String {
        request_url(&self.endpoint, &self.term)
    }
}

/// Join a search endpoint and a term. The term is appended verbatim; no
/// escaping happens here.
///
/// ```rust
/// assert_eq!(
///     docsearch_common::request_url("https://search.example/search?query=", "cf push"),
///     "https://search.example/search?query=cf push"
/// );
/// ```
pub fn request_url(endpoint: &str, term: &str) -> String {
    format!("{endpoint}{term}")
}

/// The search request could not be completed.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("invalid search URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("search endpoint returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("could not prepare HTTP client: {0}")]
    Client(String),
}

/// Rendering could not happen in the requested representation.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("don't know how to output format `{0}` (expected human or json)")]
    Unknown(String),

    #[error("error converting results to json: {0}")]
    Serialize(String),

    #[error("error writing results: {0}")]
    Write(String),
}

/// The interactive choice could not be read.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("error reading choice: {0}")]
    Read(String),

    #[error("error entering choice: `{0}` is not an integer")]
    NotAnInteger(String),
}

/// The chosen URL could not be opened.
#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("no way to open URLs on platform {0}")]
    UnsupportedPlatform(String),

    #[error("launch command for platform {0} is empty")]
    EmptyCommand(String),

    #[error("error trying to execute {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("{program} exited unsuccessfully (code {code:?})")]
    ExitStatus { program: String, code: Option<i32> },
}

/// Error types used across the docsearch system.
#[derive(thiserror::Error, Debug)]
pub enum DocSearchError {
    /// Flags or arguments were invalid.
    #[error("usage error: {0}")]
    Usage(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DocSearchError {
    /// Process exit status for this failure. Usage errors follow the
    /// convention of argument parsers and exit with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            DocSearchError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Convenient alias for results that use [`DocSearchError`].
pub type Result<T> = std::result::Result<T, DocSearchError>;
