//! File-level records flowing through the digest pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Component, PathBuf};

/// Role a file plays in the repository.
///
/// Variant order is the processing order: `Ord` is derived so a `BTreeMap`
/// keyed by category iterates CONTEXT, MANIFEST, SIGNAL, SOURCE, UNKNOWN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Context,
    Manifest,
    Signal,
    Source,
    Unknown,
}

impl FileCategory {
    /// Categories that are extracted, in the order they are processed.
    pub const PROCESSING_ORDER: [FileCategory; 4] =
        [FileCategory::Context, FileCategory::Manifest, FileCategory::Signal, FileCategory::Source];

    pub const ALL: [FileCategory; 5] = [
        FileCategory::Context,
        FileCategory::Manifest,
        FileCategory::Signal,
        FileCategory::Source,
        FileCategory::Unknown,
    ];

    /// Tag written into the `type` field of each payload record.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Context => "context_file",
            FileCategory::Manifest => "manifest_file",
            FileCategory::Signal => "signal_file",
            FileCategory::Source => "source_file",
            FileCategory::Unknown => "generic_file",
        }
    }

    pub fn base_score(&self) -> i64 {
        match self {
            FileCategory::Context => 1000,
            FileCategory::Manifest => 80,
            FileCategory::Signal => 60,
            FileCategory::Source => 50,
            FileCategory::Unknown => 0,
        }
    }

    /// Human label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            FileCategory::Context => "context files",
            FileCategory::Manifest => "manifest files",
            FileCategory::Signal => "high-signal files",
            FileCategory::Source => "source files",
            FileCategory::Unknown => "other files",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring metadata for one discovered path.
///
/// The derived fields are computed once in [`FileMetadata::new`] and never
/// change afterwards; only the scorer assigns `category` and `score`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub category: FileCategory,
    pub score: i64,
    /// Lower-cased file name including extension (`readme.md`).
    pub name_lower: String,
    /// Lower-cased final extension with its leading dot (`.py`), empty when absent.
    pub suffix_lower: String,
    /// Lower-cased name without the final extension (`file.tar` for `file.tar.gz`).
    pub stem_lower: String,
    /// Number of path components; a root-level file has depth 1.
    pub depth: usize,
    /// Lower-cased names of every ancestor directory.
    pub parents: BTreeSet<String>,
}

impl FileMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let name_lower =
            path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_lowercase();
        let suffix_lower = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        let stem_lower = path.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();

        let components: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        let depth = components.len();
        let parents = components
            .iter()
            .take(depth.saturating_sub(1))
            .map(|part| part.to_lowercase())
            .collect();

        Self {
            path,
            category: FileCategory::Unknown,
            score: 0,
            name_lower,
            suffix_lower,
            stem_lower,
            depth,
            parents,
        }
    }

    /// Path rendered with forward slashes, as written into the payload.
    pub fn display_path(&self) -> String {
        crate::utils::normalize_path(&self.path.to_string_lossy())
    }
}

/// One extracted file: either its full text or its symbol listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFile {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl ProcessedFile {
    pub fn new(
        path: impl Into<String>,
        category: FileCategory,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind: category.as_str().to_string(),
            content: content.into(),
        }
    }
}

/// Append-only accumulator of the files extracted for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProcessedFiles {
    pub category: FileCategory,
    pub files: Vec<ProcessedFile>,
}

impl CategoryProcessedFiles {
    pub fn new(category: FileCategory) -> Self {
        Self {
            category,
            files: Vec::new(),
        }
    }

    pub fn append(&mut self, file: ProcessedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A symbol reported by the tagging tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctag {
    pub path: String,
    pub kind: String,
    pub name: String,
}

impl Ctag {
    /// `"<kind> <name>"`, one line of a symbol listing.
    pub fn format(&self) -> String {
        format_tag(&self.kind, &self.name)
    }
}

pub fn format_tag(kind: &str, name: &str) -> String {
    format!("{kind} {name}")
}
