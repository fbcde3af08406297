//! Full-text extraction for context, manifest and signal files

use crate::domain::{CategoryProcessedFiles, FileCategory, FileMetadata, ProcessedFile};
use crate::error::ExtractError;
use crate::progress::ProgressSink;
use crate::tokens::{TokenBudget, TokenCounter};
use crate::utils::FileReader;
use std::path::Path;

/// Read files in order until the budget cannot afford the next one.
///
/// Missing files are skipped and read failures are logged; neither stops
/// the category. The first unaffordable file ends it.
#[allow(clippy::too_many_arguments)]
pub fn extract_readable(
    root: &Path,
    category: FileCategory,
    files: &[FileMetadata],
    counter: &dyn TokenCounter,
    budget: &mut dyn TokenBudget,
    reader: &dyn FileReader,
    progress: &dyn ProgressSink,
) -> Result<CategoryProcessedFiles, ExtractError> {
    if matches!(category, FileCategory::Source | FileCategory::Unknown) {
        return Err(ExtractError::ContractViolation(format!(
            "readable extraction does not handle {category}"
        )));
    }
    if let Some(stray) = files.iter().find(|meta| meta.category != category) {
        return Err(ExtractError::ContractViolation(format!(
            "{} extraction received {} file {}",
            category,
            stray.category,
            stray.display_path()
        )));
    }

    budget.start_category(category);
    progress.on_start(&format!("Reading {}...", category.label()), None);

    let mut processed = CategoryProcessedFiles::new(category);
    for meta in files {
        let full_path = root.join(&meta.path);
        if !full_path.exists() {
            tracing::debug!(path = %meta.display_path(), "skipping missing file");
            continue;
        }

        let content = match reader.read_file(&full_path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read file {}: {}", meta.display_path(), err.source);
                continue;
            }
        };

        let tokens = counter.count(&content);
        if !budget.can_afford(tokens) {
            tracing::info!(
                path = %meta.display_path(),
                tokens,
                "token budget exhausted, dropping remaining {}",
                category.label()
            );
            break;
        }
        budget.spend(tokens);
        processed.append(ProcessedFile::new(meta.display_path(), category, content));
    }

    progress.on_complete(&format!("Read {} {}.", processed.len(), category.label()));
    Ok(processed)
}
