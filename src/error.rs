//! Error types for footprint patching operations.

use std::path::PathBuf;

/// Result type for footprint patching operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while patching footprints.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the target package `{target}` must be in the list of footprints to import")]
    TargetNotRequested { target: String },

    #[error("library `{library}` has no readable footprints directory at {path}: {source}")]
    MissingFootprints {
        library: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("library `{library}` does not have files in their footprints folder")]
    EmptyFootprints { library: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
