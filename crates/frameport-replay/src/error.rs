//! Replay errors.

use std::{io, path::PathBuf};

use frameport_harness::SimError;
use thiserror::Error;

/// Errors that abort a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A transcript line is not valid JSON or has the wrong shape
    #[error("transcript line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A message line without an origin
    #[error("transcript line {line}: message has no origin")]
    MissingOrigin {
        /// 1-based line number
        line: usize,
    },

    /// The simulated page refused to attach the frame
    #[error("failed to attach frame: {0}")]
    Attach(#[from] SimError),

    /// Writing the report failed
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
