//! Significance scoring
//!
//! Category is decided first (first match wins), then adjusted:
//!
//! | category | base |
//! |----------|------|
//! | context  | 1000 |
//! | manifest | 80   |
//! | signal   | 60   |
//! | source   | 50   |
//! | unknown  | 0    |
//!
//! `score = base - 5 * (depth - 1) - (100 if under an ignored directory)`

use crate::domain::{FileCategory, FileMetadata, LanguageProfile, UNIVERSAL_CONTEXT_FILES};
use std::path::Path;

pub const DEPTH_PENALTY: i64 = 5;
pub const IGNORED_DIR_PENALTY: i64 = 100;

pub fn calculate_significance(path: &Path, profile: &LanguageProfile) -> FileMetadata {
    let mut meta = FileMetadata::new(path);
    meta.category = classify(&meta, profile);

    let mut score = meta.category.base_score();
    // root-level files (depth 1) carry no depth penalty
    if meta.depth > 1 {
        score -= (meta.depth as i64 - 1) * DEPTH_PENALTY;
    }
    if profile.in_ignored_dir(meta.parents.iter()) {
        score -= IGNORED_DIR_PENALTY;
    }
    meta.score = score;
    meta
}

fn classify(meta: &FileMetadata, profile: &LanguageProfile) -> FileCategory {
    if is_context_file(meta) {
        FileCategory::Context
    } else if profile.is_manifest(&meta.name_lower, &meta.suffix_lower) {
        FileCategory::Manifest
    } else if profile.is_signal(&meta.stem_lower, &meta.suffix_lower) {
        FileCategory::Signal
    } else if profile.is_source_extension(&meta.suffix_lower) {
        FileCategory::Source
    } else {
        FileCategory::Unknown
    }
}

fn is_context_file(meta: &FileMetadata) -> bool {
    UNIVERSAL_CONTEXT_FILES.contains(&meta.name_lower.as_str())
        || meta.name_lower.starts_with("readme")
        || meta.suffix_lower == ".md"
}
