use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when configuring a measurement session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The file requested as the output sink could not be created or opened for writing.
    #[error("cannot open action timing output file '{}': {source}", .path.display())]
    OutputFileOpen {
        /// The path the caller asked to write to.
        path: PathBuf,

        /// The underlying I/O failure.
        source: io::Error,
    },
}

/// A specialized `Result` type for `action_clock` operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
