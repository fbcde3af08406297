//! Module root discovery
//!
//! A directory holding one of the language's manifest files is treated as a
//! module root and offered as a scope.

use crate::domain::{FileMetadata, LanguageProfile};
use crate::utils::normalize_path;
use std::collections::BTreeSet;
use std::path::Path;

/// Distinct parent directories of manifest files, sorted. The repository
/// root is reported as `.`.
pub fn discover_modules<P: AsRef<Path>>(paths: &[P], profile: &LanguageProfile) -> Vec<String> {
    let mut modules = BTreeSet::new();
    for path in paths {
        let meta = FileMetadata::new(path.as_ref());
        if !profile.is_manifest(&meta.name_lower, &meta.suffix_lower) {
            continue;
        }

        let parent = meta
            .path
            .parent()
            .map(|p| normalize_path(&p.to_string_lossy()))
            .unwrap_or_default();
        modules.insert(if parent.is_empty() { ".".to_string() } else { parent });
    }
    modules.into_iter().collect()
}

/// Drop selections already covered by a selected ancestor.
///
/// `.` covers everything and collapses the selection to `["."]`.
pub fn collapse_nested_scopes(selection: &[String]) -> Vec<String> {
    if selection.iter().any(|scope| scope == ".") {
        return vec![".".to_string()];
    }

    let mut sorted: Vec<&String> = selection.iter().collect();
    sorted.sort();

    let mut kept: Vec<String> = Vec::new();
    for scope in sorted {
        let covered = kept.iter().any(|parent| {
            scope == parent
                || scope
                    .strip_prefix(parent.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        });
        if !covered {
            kept.push(scope.clone());
        }
    }
    kept
}
