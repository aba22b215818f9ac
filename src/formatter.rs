use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{Position, Range, TextEdit, Url};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("document uri {0} does not name a local file")]
    InvalidUri(Url),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<FormatError> for jsonrpc::Error {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::InvalidUri(_) => jsonrpc::Error::invalid_params(err.to_string()),
            FormatError::Read { .. } => {
                let mut rpc = jsonrpc::Error::internal_error();
                rpc.message = err.to_string().into();
                rpc
            }
        }
    }
}

/// Formats the file behind `uri` from its current on-disk content.
///
/// The session store is deliberately not consulted: unsaved editor state
/// never reaches the formatter. The `file:` URI is percent-decoded into a
/// filesystem path before reading.
pub fn format_document(uri: &Url) -> Result<Vec<TextEdit>, FormatError> {
    let path = uri
        .to_file_path()
        .map_err(|()| FormatError::InvalidUri(uri.clone()))?;
    let content = std::fs::read_to_string(&path).map_err(|source| FormatError::Read {
        path: path.clone(),
        source,
    })?;
    Ok(line_edits(&content))
}

/// One full-line edit per line whose normalized form differs from the
/// line as read.
fn line_edits(content: &str) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    for (index, line) in content.split('\n').enumerate() {
        let normalized = normalize_line(line);
        if normalized != line {
            edits.push(TextEdit {
                range: Range {
                    start: Position::new(index as u32, 0),
                    end: Position::new(index as u32, utf16_len(line)),
                },
                new_text: normalized,
            });
        }
    }
    edits
}

fn utf16_len(line: &str) -> u32 {
    line.chars().map(|ch| ch.len_utf16() as u32).sum()
}

/// Sentence Normalization for one line.
///
/// The line is split on `.` into sentences. Each sentence is trimmed,
/// re-spaced to single spaces, its first word capitalized, every other word
/// lowercased, and terminated with `.`. Sentences that reduce to no words
/// are dropped, and the surviving sentences are rejoined with single
/// spaces. Not guaranteed idempotent for every input with consecutive
/// delimiters or dotted abbreviations; see the tests for the cases that
/// hold.
pub fn normalize_line(line: &str) -> String {
    let mut sentences = Vec::new();
    for sentence in line.split('.') {
        let words: Vec<String> = sentence
            .trim()
            .split(' ')
            .filter(|word| !word.is_empty())
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    capitalize(word)
                } else {
                    word.to_lowercase()
                }
            })
            .collect();
        if !words.is_empty() {
            sentences.push(format!("{}.", words.join(" ")));
        }
    }
    sentences.join(" ")
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
