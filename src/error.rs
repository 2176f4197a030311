//! Error types for search configuration and execution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("Maximum length must be at least 1")]
    InvalidMaxLength,

    #[error("Keyspace {base}^{length} does not fit in a 64-bit index")]
    KeyspaceOverflow { base: usize, length: usize },

    #[error("Target hash is empty")]
    EmptyTarget,

    #[error("Target hash is not valid hex: {0}")]
    InvalidTargetHex(#[from] hex::FromHexError),

    #[error("Target hash is {actual} bytes but {algorithm} produces {expected}-byte digests")]
    DigestLengthMismatch {
        algorithm: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown hash algorithm: '{0}'")]
    UnknownAlgorithm(String),

    #[error("Unknown charset: '{0}'")]
    UnknownCharset(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
