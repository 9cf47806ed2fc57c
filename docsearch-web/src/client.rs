use std::time::Instant;

use docsearch_common::{FetchError, SearchResult, request_url};
use docsearch_http::{HttpClient, HttpError, RequestOpts};

use crate::extract::ResultExtractor;

/// Issues one GET against a search endpoint and extracts the results.
#[derive(Clone)]
pub struct SearchClient {
    http: HttpClient,
    endpoint: String,
    extractor: ResultExtractor,
}

impl SearchClient {
    /// `endpoint` must already carry every fixed query parameter and end in
    /// the delimiter the term is appended to.
    pub fn new(http: HttpClient, endpoint: impl Into<String>, extractor: ResultExtractor) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            extractor,
        }
    }

    /// The term is appended to the endpoint verbatim.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>, FetchError> {
        let url = request_url(&self.endpoint, term);
        let term_snippet = if term.chars().count() > 160 {
            format!("{}…", term.chars().take(160).collect::<String>())
        } else {
            term.to_string()
        };
        let started = Instant::now();
        tracing::info!(
            target: "docsearch.search",
            term = %term_snippet,
            "docsearch.search.start"
        );

        let body = self
            .http
            .get_text(&url, RequestOpts::default())
            .await
            .map_err(|e| fetch_error(&url, e))?;

        let results = self.extractor.extract_str(&body);
        tracing::info!(
            target: "docsearch.search",
            term = %term_snippet,
            result_count = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "docsearch.search.done"
        );
        Ok(results)
    }
}

fn fetch_error(url: &str, err: HttpError) -> FetchError {
    let url = url.to_string();
    match err {
        HttpError::Url(message) => FetchError::InvalidUrl { url, message },
        HttpError::Build(message) => FetchError::Client(message),
        HttpError::Network(message) => FetchError::Network { url, message },
        HttpError::Status { status, .. } => FetchError::Status {
            url,
            status: status.as_u16(),
        },
    }
}
