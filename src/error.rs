//! Error types for the extraction core
//!
//! Only contract violations escape the pipeline. File and subprocess errors
//! are recovered where they happen and surface as log lines.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("contract violation: {0}")]
    ContractViolation(String),
}

#[derive(Debug, Error)]
#[error("failed to read file {path}: {source}")]
pub struct FileReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum CtagsError {
    #[error("no ctags binary found: {0}")]
    NotFound(String),

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ctags output stream failed: {0}")]
    Stream(#[from] std::io::Error),
}
