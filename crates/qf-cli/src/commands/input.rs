//! Reading stop places from JSON lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use qf_core::StopPlace;

/// A line of input that could not be turned into a stop place.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read line {line}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("invalid stop place JSON on line {line}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Opens the given file, or stdin when no path is given.
pub fn open(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input file: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Lazily parses one stop place per non-blank line.
pub fn stop_places<R: BufRead>(reader: R) -> impl Iterator<Item = Result<StopPlace, InputError>> {
    reader.lines().enumerate().filter_map(|(idx, line)| {
        let line_number = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(source) => {
                return Some(Err(InputError::Io {
                    line: line_number,
                    source,
                }));
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(
            serde_json::from_str(trimmed).map_err(|source| InputError::Json {
                line: line_number,
                source,
            }),
        )
    })
}
