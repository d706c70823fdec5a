//! Errors `resolve` may return, per the four kinds in the external interface.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input path is not absolute.
    #[error("{message}")]
    Path { message: String },

    /// The caller requested a version newer than [`crate::MAX_VERSION`].
    #[error("{message}")]
    Version { message: String },

    /// A configuration file is syntactically malformed.
    #[error("{}:{line}: {message}", path.display())]
    Parse { path: PathBuf, line: usize, message: String },

    /// A known option has a value outside its permitted domain.
    #[error("{}: {message}", path.display())]
    InvalidValue {
        path: PathBuf,
        option: String,
        value: String,
        message: String,
    },

    /// A configuration file exists but could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
