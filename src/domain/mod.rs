//! Core data model shared across the pipeline

pub mod config;
pub mod file;
pub mod language;

pub use config::{Config, TokenizerKind, REPORT_SCHEMA_VERSION};
pub use file::{format_tag, CategoryProcessedFiles, Ctag, FileCategory, FileMetadata, ProcessedFile};
pub use language::{
    is_allowed_kind, LanguageProfile, SupportedLanguage, CTAGS_KINDS, UNIVERSAL_CONTEXT_FILES,
};
