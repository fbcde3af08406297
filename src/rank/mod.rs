//! File categorization and ordering by significance

use crate::domain::{FileCategory, FileMetadata, LanguageProfile};
use crate::progress::ProgressSink;
use std::collections::BTreeMap;
use std::path::Path;

pub mod significance;

pub use significance::calculate_significance;

pub type FilesByCategory = BTreeMap<FileCategory, Vec<FileMetadata>>;

/// Score every path and group it by category.
///
/// The result holds an entry for every category, empty or not. Progress
/// advances in 10% steps of `paths.len()`.
pub fn categorize_files<P: AsRef<Path>>(
    paths: &[P],
    profile: &LanguageProfile,
    progress: &dyn ProgressSink,
) -> FilesByCategory {
    let mut by_category: FilesByCategory =
        FileCategory::ALL.iter().map(|category| (*category, Vec::new())).collect();

    let total = paths.len();
    let step = (total / 10).max(1);
    progress.on_start(&format!("Categorizing {total} files..."), Some(total as u64));

    for (idx, path) in paths.iter().enumerate() {
        let meta = calculate_significance(path.as_ref(), profile);
        by_category.entry(meta.category).or_default().push(meta);
        if (idx + 1) % step == 0 {
            progress.on_advance(step as u64);
        }
    }

    let relevant = relevant_count(&by_category);
    tracing::debug!(total, relevant, "categorized repository files");
    progress.on_complete(&format!("Found {relevant} relevant files."));

    by_category
}

/// Number of files in every category except UNKNOWN.
pub fn relevant_count(by_category: &FilesByCategory) -> usize {
    by_category
        .iter()
        .filter(|(category, _)| **category != FileCategory::Unknown)
        .map(|(_, files)| files.len())
        .sum()
}

/// Processing order within a category: score descending, then depth ascending.
///
/// The sort is stable, so ties keep their listing order.
pub fn sort_for_processing(files: &mut [FileMetadata]) {
    files.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.depth.cmp(&b.depth)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::testing::RecordingProgress;
    use crate::progress::NoProgress;

    fn profile() -> LanguageProfile {
        LanguageProfile::new(["requirements.txt"], [".py"], ["main"], ["tests"])
    }

    #[test]
    fn test_categorize_groups_all_categories() {
        let paths = ["README.md", "src/main.py", "tests/util.py", "package.json"];
        let grouped = categorize_files(&paths, &profile(), &NoProgress);

        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped[&FileCategory::Context].len(), 1);
        assert_eq!(grouped[&FileCategory::Signal].len(), 1);
        assert_eq!(grouped[&FileCategory::Source].len(), 1);
        assert_eq!(grouped[&FileCategory::Unknown].len(), 1);
        assert!(grouped[&FileCategory::Manifest].is_empty());
        assert_eq!(relevant_count(&grouped), 3);
    }

    #[test]
    fn test_categorize_empty_input() {
        let paths: Vec<&str> = Vec::new();
        let grouped = categorize_files(&paths, &profile(), &NoProgress);
        assert!(grouped.values().all(Vec::is_empty));
    }

    #[test]
    fn test_progress_advances_in_tenths() {
        let paths: Vec<String> = (0..25).map(|i| format!("f{i}.py")).collect();
        let progress = RecordingProgress::default();
        categorize_files(&paths, &profile(), &progress);

        let events = progress.events.borrow();
        let advances = events.iter().filter(|e| e.starts_with("advance:")).count();
        assert_eq!(advances, 12); // step of 2 over 25 files
        assert!(events.first().unwrap().starts_with("start:Categorizing 25 files"));
        assert_eq!(events.last().unwrap(), "complete:Found 25 relevant files.");
    }

    #[test]
    fn test_sort_by_score_then_depth() {
        let mut files = vec![
            FileMetadata {
                score: 40,
                depth: 3,
                ..FileMetadata::new("a/b/low.py")
            },
            FileMetadata {
                score: 50,
                depth: 3,
                ..FileMetadata::new("a/b/deep.py")
            },
            FileMetadata {
                score: 50,
                depth: 1,
                ..FileMetadata::new("shallow.py")
            },
            FileMetadata {
                score: -55,
                depth: 2,
                ..FileMetadata::new("tests/x.py")
            },
        ];
        sort_for_processing(&mut files);
        let order: Vec<String> = files.iter().map(FileMetadata::display_path).collect();
        assert_eq!(order, vec!["shallow.py", "a/b/deep.py", "a/b/low.py", "tests/x.py"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut files = vec![
            calculate_significance(Path::new("b.py"), &profile()),
            calculate_significance(Path::new("a.py"), &profile()),
        ];
        sort_for_processing(&mut files);
        assert_eq!(files[0].display_path(), "b.py");
    }
}
