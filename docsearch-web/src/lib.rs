//! Search-page acquisition and result extraction.
//!
//! - HTML result extraction (`extract`) built on `scraper`
//! - One-shot search client (`client`) on top of `docsearch-http`

pub mod client;
pub mod extract;

pub use client::SearchClient;
pub use extract::{ExtractError, ResultExtractor};
