// crates/ziptools-core/src/error.rs

use thiserror::Error;

/// Everything that can go wrong while building or querying the index.
#[derive(Debug, Error)]
pub enum ZipError {
    /// A namespace the operation needs is absent: the store was never built,
    /// or the build stopped half way.
    #[error("namespace not found: {0}")]
    NamespaceMissing(String),

    /// Key absent, or present with an empty value. The two are not told apart.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored bytes do not have the shape of the expected record or list.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// A source row could not be used. Logged and skipped by the builder.
    #[error("malformed input row {line}: {reason}")]
    InputRow { line: u64, reason: String },

    /// A code list longer than the one-byte length prefix can describe.
    #[error("code list too long: {0} > 255")]
    ListOverflow(usize),

    /// The postings writer of a derivation pass went away.
    #[error("derivation pipeline failed: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, ZipError>;

impl ZipError {
    /// True for the "nothing matched" outcomes a caller should present as an
    /// empty answer rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ZipError::NotFound(_))
    }
}
