use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults that stop an input from being read or configured.
///
/// Discrepancies between ranked lists are not errors; they are the output of
/// a failing comparison and live in the report.
#[derive(Error, Debug)]
pub enum Error {
    /// A corpus or result file is missing or unreadable
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An ignorable-line pattern failed to compile
    #[error("invalid ignorable pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, source: fancy_regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source: Box::new(source),
        }
    }
}
