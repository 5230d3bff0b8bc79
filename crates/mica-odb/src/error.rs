//! Object database error types.

use thiserror::Error;

/// Errors that can occur during object database operations.
#[derive(Debug, Error)]
pub enum OdbError {
    /// No object exists under the given identifier.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The kind tag in an object header is not recognized.
    #[error("unsupported object type: {0}")]
    UnsupportedType(String),

    /// The object header is missing a delimiter or carries an
    /// unparsable size field.
    #[error("malformed object header: {0}")]
    MalformedHeader(String),

    /// The size declared in the header disagrees with the actual
    /// payload length.
    #[error("size mismatch: header declares {declared} bytes, payload has {actual}")]
    SizeMismatch {
        /// Size recorded in the object header.
        declared: usize,
        /// Actual payload length after the header.
        actual: usize,
    },

    /// The compressed stream could not be produced or consumed.
    #[error("compression error: {0}")]
    Compression(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
