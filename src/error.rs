//! Error type shared by the library. Binaries wrap these in `anyhow` so they can add context about
//! which file or stage failed.
use crate::corpus::Task;
use std::io;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Accuracy scoring was asked for a mode other than `train` or `test`
    #[error("invalid scoring mode '{0}', expected either 'train' or 'test'")]
    InvalidMode(String),
    /// A word handed to the inference helpers can't be expressed in the vocabulary
    #[error("invalid word input: {0}")]
    InvalidInput(String),
    /// Running a read (G2P) helper on a write (P2G) model or vice versa
    #[error("model was trained for the {actual} task but the {expected} task was requested")]
    TaskMismatch { expected: Task, actual: Task },
    #[error("symbol '{0}' is not in the vocabulary")]
    UnknownSymbol(String),
    #[error("index {0} is not in the vocabulary")]
    UnknownIndex(i64),
    /// Two symbols share an index in a persisted mapping
    #[error("index {index} is assigned to both '{first}' and '{second}'")]
    DuplicateIndex {
        index: i64,
        first: String,
        second: String,
    },
    #[error("shape mismatch: {0}")]
    Shape(String),
    #[error("corpus is empty")]
    EmptyCorpus,
    #[error("{sources} source sequences but {targets} target sequences")]
    LengthMismatch { sources: usize, targets: usize },
    #[error("target sequences have different lengths ({min} to {max}) and padding is disabled")]
    RaggedTargets { min: usize, max: usize },
    /// Malformed corpus content that can't be skipped
    #[error("corpus error: {0}")]
    Corpus(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to write archive: {0}")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),
    #[error("failed to read archive: {0}")]
    NpzRead(#[from] ndarray_npy::ReadNpzError),
}
