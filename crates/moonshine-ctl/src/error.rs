//! CLI error type.

use std::path::PathBuf;

use moonshine_sdk::BuilderError;

pub(crate) type CtlResult<T> = Result<T, CtlError>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CtlError {
    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error("{0}")]
    Config(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}
