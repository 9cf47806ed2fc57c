//! Result extraction from a search-results page.
//!
//! A result block is any element matching the result selector; its first
//! element matching the link selector supplies the `href` and the visible
//! text. Blocks without a link, and links without an `href`, are skipped.

use docsearch_common::SearchResult;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid {role} selector `{selector}`: {message}")]
    Selector {
        role: &'static str,
        selector: String,
        message: String,
    },
}

/// Pulls [`SearchResult`]s out of parsed HTML.
#[derive(Debug, Clone)]
pub struct ResultExtractor {
    result_sel: Selector,
    link_sel: Selector,
}

impl ResultExtractor {
    pub fn new(result_selector: &str, link_selector: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            result_sel: parse_selector("result", result_selector)?,
            link_sel: parse_selector("link", link_selector)?,
        })
    }

    /// Results in document order. No matching blocks yields an empty vector.
    pub fn extract(&self, document: &Html) -> Vec<SearchResult> {
        let mut blocks = 0usize;
        let results: Vec<SearchResult> = document
            .select(&self.result_sel)
            .inspect(|_| blocks += 1)
            .filter_map(|block| {
                let link = block.select(&self.link_sel).next()?;
                let href = link.value().attr("href")?;
                Some(SearchResult {
                    url: href.to_string(),
                    description: collapsed_text(link),
                })
            })
            .collect();

        tracing::debug!(
            blocks,
            results = results.len(),
            skipped = blocks - results.len(),
            "extract.done"
        );
        results
    }

    pub fn extract_str(&self, html: &str) -> Vec<SearchResult> {
        self.extract(&Html::parse_document(html))
    }
}

fn parse_selector(role: &'static str, selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        role,
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

/// All descendant text, with whitespace runs collapsed to one space.
fn collapsed_text(el: ElementRef<'_>) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
