//! Budgeted extraction across categories
//!
//! Categories run strictly in [`FileCategory::PROCESSING_ORDER`] against one
//! shared budget, so whatever an earlier category leaves unspent is available
//! to the later ones.

use crate::ctags::TagSource;
use crate::domain::config::DEFAULT_BATCH_SIZE;
use crate::domain::{CategoryProcessedFiles, FileCategory};
use crate::error::ExtractError;
use crate::progress::{NoProgress, ProgressSink};
use crate::rank::{sort_for_processing, FilesByCategory};
use crate::tokens::{TokenBudget, TokenCounter};
use crate::utils::{FileReader, FilesystemReader};
use std::collections::BTreeMap;
use std::path::Path;

pub mod readable;
pub mod symbols;

pub use readable::extract_readable;
pub use symbols::extract_symbols;

pub type ProcessedByCategory = BTreeMap<FileCategory, CategoryProcessedFiles>;

/// Collaborators for one extraction run.
pub struct Extraction<'a> {
    root: &'a Path,
    counter: &'a dyn TokenCounter,
    tags: &'a dyn TagSource,
    reader: &'a dyn FileReader,
    progress: &'a dyn ProgressSink,
    batch_size: usize,
}

impl<'a> Extraction<'a> {
    pub fn new(root: &'a Path, counter: &'a dyn TokenCounter, tags: &'a dyn TagSource) -> Self {
        Self {
            root,
            counter,
            tags,
            reader: &FilesystemReader,
            progress: &NoProgress,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_reader(mut self, reader: &'a dyn FileReader) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Process every non-empty category in order.
    ///
    /// Empty categories are skipped entirely: they never start their budget
    /// allocation and do not appear in the result. UNKNOWN files are never
    /// processed.
    pub fn process_files(
        &self,
        mut files_by_category: FilesByCategory,
        budget: &mut dyn TokenBudget,
    ) -> Result<ProcessedByCategory, ExtractError> {
        let mut results = ProcessedByCategory::new();

        for category in FileCategory::PROCESSING_ORDER {
            let Some(mut files) = files_by_category
                .remove(&category)
                .filter(|f| !f.is_empty())
            else {
                continue;
            };
            sort_for_processing(&mut files);

            let processed = match category {
                FileCategory::Source => extract_symbols(
                    self.root,
                    &files,
                    self.counter,
                    budget,
                    self.tags,
                    self.batch_size,
                    self.progress,
                )?,
                _ => extract_readable(
                    self.root,
                    category,
                    &files,
                    self.counter,
                    budget,
                    self.reader,
                    self.progress,
                )?,
            };

            tracing::debug!(
                %category,
                candidates = files.len(),
                kept = processed.len(),
                "category processed"
            );
            results.insert(category, processed);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctags::TagGroup;
    use crate::domain::{FileMetadata, LanguageProfile};
    use crate::error::CtagsError;
    use crate::rank::categorize_files;
    use crate::tokens::{FixedTokenCounter, PooledTokenBudget, TokenLimits};
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct NoTags;

    impl TagSource for NoTags {
        fn tag_batch(&self, _paths: &[PathBuf]) -> Result<Vec<TagGroup>, CtagsError> {
            Ok(Vec::new())
        }
    }

    /// Records which categories were started, in order.
    #[derive(Default)]
    struct RecordingBudget {
        started: RefCell<Vec<FileCategory>>,
    }

    impl TokenBudget for RecordingBudget {
        fn start_category(&mut self, category: FileCategory) {
            self.started.borrow_mut().push(category);
        }

        fn can_afford(&self, _count: usize) -> bool {
            true
        }

        fn spend(&mut self, _count: usize) {}
    }

    fn profile() -> LanguageProfile {
        LanguageProfile::new(["requirements.txt"], [".py"], ["main"], ["tests"])
    }

    fn repo(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_empty_categories_are_skipped() {
        let dir = repo(&[("README.md", "hello"), ("src/main.py", "print()")]);
        let grouped = categorize_files(&["README.md", "src/main.py"], &profile(), &NoProgress);
        let mut budget = RecordingBudget::default();

        let results = Extraction::new(dir.path(), &FixedTokenCounter(1), &NoTags)
            .process_files(grouped, &mut budget)
            .unwrap();

        assert_eq!(
            results.keys().copied().collect::<Vec<_>>(),
            vec![FileCategory::Context, FileCategory::Signal]
        );
        assert_eq!(*budget.started.borrow(), vec![FileCategory::Context, FileCategory::Signal]);
    }

    #[test]
    fn test_categories_run_in_fixed_order() {
        let dir = repo(&[
            ("README.md", "r"),
            ("requirements.txt", "x"),
            ("main.py", "m"),
            ("lib/util.py", "u"),
        ]);
        let grouped = categorize_files(
            &["lib/util.py", "main.py", "requirements.txt", "README.md"],
            &profile(),
            &NoProgress,
        );
        let mut budget = RecordingBudget::default();

        Extraction::new(dir.path(), &FixedTokenCounter(1), &NoTags)
            .process_files(grouped, &mut budget)
            .unwrap();

        assert_eq!(*budget.started.borrow(), FileCategory::PROCESSING_ORDER.to_vec());
    }

    #[test]
    fn test_files_sorted_before_extraction() {
        let dir = repo(&[("docs/README.md", "deep"), ("README.md", "root")]);
        let grouped = categorize_files(&["docs/README.md", "README.md"], &profile(), &NoProgress);
        let limits = TokenLimits::new(1, BTreeMap::from([(FileCategory::Context, 1.0)]));
        let mut budget = PooledTokenBudget::new(limits);

        let results = Extraction::new(dir.path(), &FixedTokenCounter(1), &NoTags)
            .process_files(grouped, &mut budget)
            .unwrap();

        let context = &results[&FileCategory::Context];
        assert_eq!(context.len(), 1);
        assert_eq!(context.files[0].path, "README.md");
    }

    #[test]
    fn test_unknown_files_never_processed() {
        let dir = repo(&[("package.json", "{}")]);
        let mut grouped = FilesByCategory::new();
        grouped.insert(FileCategory::Unknown, vec![FileMetadata::new("package.json")]);
        let mut budget = RecordingBudget::default();

        let results = Extraction::new(dir.path(), &FixedTokenCounter(1), &NoTags)
            .process_files(grouped, &mut budget)
            .unwrap();
        assert!(results.is_empty());
        assert!(budget.started.borrow().is_empty());
    }
}
