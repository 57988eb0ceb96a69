//! Error types shared across the pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("inference error: {0}")]
    Inference(String),

    #[error("cannot write to {target}: {source}")]
    OutputWrite {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type SummarizeResult<T> = Result<T, SummarizeError>;
