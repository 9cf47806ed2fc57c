use std::io::{BufRead, Write};

use docsearch_common::{Result, SearchQuery};
use docsearch_web::SearchClient;

use crate::launch::UrlOpener;
use crate::present;
use crate::select::{self, Selection};

/// How a search invocation ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Non-interactive output was written.
    Rendered { count: usize },
    /// Human output was written and the prompt was answered.
    Selected(Selection),
}

/// fetch -> render -> (human only) prompt -> open.
///
/// A fetch failure aborts before anything is written.
pub async fn run<R, W, O>(
    query: &SearchQuery,
    client: &SearchClient,
    input: &mut R,
    out: &mut W,
    opener: &O,
) -> Result<Outcome>
where
    R: BufRead,
    W: Write,
    O: UrlOpener + ?Sized,
{
    let results = client.search(&query.term).await?;
    present::render(&results, query.format, out)?;

    if !query.format.is_interactive() {
        return Ok(Outcome::Rendered {
            count: results.len(),
        });
    }

    let selection = select::choose(&results, input, out, opener)?;
    Ok(Outcome::Selected(selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_common::{
        DocSearchError, FetchError, LaunchError, OutputFormat, SearchResult,
    };
    use docsearch_http::HttpClient;
    use docsearch_web::ResultExtractor;
    use std::cell::RefCell;
    use std::io::Cursor;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><body>
<div class="content-block-item result"><a href="/docs/a">Buildpack overview</a></div>
<div class="content-block-item result"><a href="/docs/b">Buildpack lifecycle</a></div>
</body></html>"#;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &str) -> std::result::Result<(), LaunchError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "buildpacks"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn setup(server: &MockServer, format: OutputFormat) -> (SearchQuery, SearchClient) {
        let endpoint = format!("{}/search?query=", server.uri());
        let client = SearchClient::new(
            HttpClient::new().unwrap(),
            endpoint.clone(),
            ResultExtractor::new(".content-block-item.result", "a").unwrap(),
        );
        (SearchQuery::new("buildpacks", endpoint, format), client)
    }

    #[tokio::test]
    async fn human_search_lists_then_opens_choice() {
        let server = serve(200, PAGE).await;
        let (query, client) = setup(&server, OutputFormat::Human);
        let opener = RecordingOpener::default();
        let mut input = Cursor::new(b"1\n".to_vec());
        let mut out = Vec::new();

        let outcome = run(&query, &client, &mut input, &mut out, &opener)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Selected(Selection::Launched {
                index: 1,
                url: "/docs/b".into()
            })
        );
        assert_eq!(*opener.opened.borrow(), vec!["/docs/b".to_string()]);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0 | /docs/a | Buildpack overview\n\
             1 | /docs/b | Buildpack lifecycle\n\
             \nEnter Choice: Chose 1, going to /docs/b\n"
        );
    }

    #[tokio::test]
    async fn json_search_never_prompts() {
        let server = serve(200, PAGE).await;
        let (query, client) = setup(&server, OutputFormat::Json);
        let opener = RecordingOpener::default();
        let mut input = Cursor::new(b"0\n".to_vec());
        let mut out = Vec::new();

        let outcome = run(&query, &client, &mut input, &mut out, &opener)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Rendered { count: 2 });
        assert!(opener.opened.borrow().is_empty());
        let text = String::from_utf8(out).unwrap();
        let back: Vec<SearchResult> = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(
            back,
            vec![
                SearchResult::new("/docs/a", "Buildpack overview"),
                SearchResult::new("/docs/b", "Buildpack lifecycle"),
            ]
        );
    }

    #[tokio::test]
    async fn out_of_range_choice_is_not_an_error() {
        let server = serve(200, PAGE).await;
        let (query, client) = setup(&server, OutputFormat::Human);
        let opener = RecordingOpener::default();
        let mut input = Cursor::new(b"7\n".to_vec());
        let mut out = Vec::new();

        let outcome = run(&query, &client, &mut input, &mut out, &opener)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Selected(Selection::OutOfRange(7)));
        assert!(opener.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_writes_nothing() {
        let server = serve(502, "bad gateway").await;
        let (query, client) = setup(&server, OutputFormat::Human);
        let opener = RecordingOpener::default();
        let mut input = Cursor::new(b"0\n".to_vec());
        let mut out = Vec::new();

        let err = run(&query, &client, &mut input, &mut out, &opener)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DocSearchError::Fetch(FetchError::Status { status: 502, .. })
        ));
        assert_eq!(err.exit_code(), 1);
        assert!(out.is_empty());
        assert!(opener.opened.borrow().is_empty());
    }
}
