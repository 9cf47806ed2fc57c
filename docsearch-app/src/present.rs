use std::io::Write;

use docsearch_common::{FormatError, OutputFormat, SearchResult};

/// Write `results` to `out` in the requested representation.
///
/// Human output is one `index | url | description` line per result and
/// nothing at all for an empty list. JSON output is a single line holding an
/// array of `{"url", "description"}` objects.
pub fn render<W: Write>(
    results: &[SearchResult],
    format: OutputFormat,
    out: &mut W,
) -> Result<(), FormatError> {
    match format {
        OutputFormat::Human => {
            for (idx, r) in results.iter().enumerate() {
                writeln!(out, "{} | {} | {}", idx, r.url, r.description)
                    .map_err(|e| FormatError::Write(e.to_string()))?;
            }
        }
        OutputFormat::Json => {
            let js = serde_json::to_string(results)
                .map_err(|e| FormatError::Serialize(e.to_string()))?;
            writeln!(out, "{js}").map_err(|e| FormatError::Write(e.to_string()))?;
        }
    }
    out.flush().map_err(|e| FormatError::Write(e.to_string()))?;
    tracing::debug!(format = %format, count = results.len(), "present.rendered");
    Ok(())
}
