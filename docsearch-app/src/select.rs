use std::io::{BufRead, Write};

use docsearch_common::{FormatError, InputError, Result, SearchResult};

use crate::launch::UrlOpener;

pub const PROMPT: &str = "\nEnter Choice: ";

/// What happened after the user answered the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The URL at `index` was handed to the opener successfully.
    Launched { index: usize, url: String },
    /// The choice was negative or past the end; nothing was opened.
    OutOfRange(i64),
}

/// Prompt once and read a single integer. There is no re-prompt.
pub fn read_choice<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<i64> {
    write!(out, "{PROMPT}").map_err(|e| FormatError::Write(e.to_string()))?;
    out.flush().map_err(|e| FormatError::Write(e.to_string()))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| InputError::Read(e.to_string()))?;

    let answer = line.trim();
    answer
        .parse::<i64>()
        .map_err(|_| InputError::NotAnInteger(answer.to_string()).into())
}

/// Index into `results` for `choice`, if it names one.
fn resolve(choice: i64, len: usize) -> Option<usize> {
    usize::try_from(choice).ok().filter(|idx| *idx < len)
}

/// Ask for a result number and open it.
pub fn choose<R, W, O>(
    results: &[SearchResult],
    input: &mut R,
    out: &mut W,
    opener: &O,
) -> Result<Selection>
where
    R: BufRead,
    W: Write,
    O: UrlOpener + ?Sized,
{
    let choice = read_choice(input, out)?;

    let Some(index) = resolve(choice, results.len()) else {
        tracing::info!(choice, available = results.len(), "select.out_of_range");
        writeln!(out, "Invalid choice {choice}").map_err(|e| FormatError::Write(e.to_string()))?;
        return Ok(Selection::OutOfRange(choice));
    };

    let url = &results[index].url;
    writeln!(out, "Chose {index}, going to {url}").map_err(|e| FormatError::Write(e.to_string()))?;
    out.flush().map_err(|e| FormatError::Write(e.to_string()))?;

    opener.open(url)?;
    Ok(Selection::Launched {
        index,
        url: url.clone(),
    })
}
