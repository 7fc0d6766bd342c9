//! Crate-wide error type

use thiserror::Error;

/// Errors produced while locating, decrypting, or decoding replay data
#[derive(Debug, Error)]
pub enum Error {
    /// The bytes do not satisfy a structural invariant of the MPQ container
    /// or the bit-packed protocol (missing magic, truncated read, bad skip
    /// tag, out-of-range type-id, ...). Fatal for the current file.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A named member file was looked up but no hash-table entry matched.
    #[error("file not found in archive: {0}")]
    FileNotFound(String),

    /// A recognized but unimplemented compression method or protocol
    /// feature was encountered (e.g. LZMA, PKWare Implode).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Reading the archive off disk failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Construct an [`Error::InvalidFormat`] from anything `Display`-able
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Error::InvalidFormat(msg.into())
    }

    /// Construct an [`Error::FileNotFound`]
    pub fn file_not_found(name: impl Into<String>) -> Self {
        Error::FileNotFound(name.into())
    }

    /// Construct an [`Error::Unsupported`]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
