//! Symbol outlines for source files via the tagging tool

use crate::ctags::TagSource;
use crate::domain::{CategoryProcessedFiles, FileCategory, FileMetadata, ProcessedFile};
use crate::error::ExtractError;
use crate::progress::ProgressSink;
use crate::tokens::{TokenBudget, TokenCounter};
use crate::utils::relative_to;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Tag source files in batches and keep each file's outline while the
/// budget allows.
///
/// The pass ends on the first unaffordable outline or the first failed
/// batch. Files the tool reports no symbols for produce no output.
#[allow(clippy::too_many_arguments)]
pub fn extract_symbols(
    root: &Path,
    files: &[FileMetadata],
    counter: &dyn TokenCounter,
    budget: &mut dyn TokenBudget,
    tags: &dyn TagSource,
    batch_size: usize,
    progress: &dyn ProgressSink,
) -> Result<CategoryProcessedFiles, ExtractError> {
    if let Some(stray) = files.iter().find(|meta| meta.category != FileCategory::Source) {
        return Err(ExtractError::ContractViolation(format!(
            "symbol extraction received {} file {}",
            stray.category,
            stray.display_path()
        )));
    }

    budget.start_category(FileCategory::Source);
    progress.on_start("Generating code symbols...", None);

    let mut processed = CategoryProcessedFiles::new(FileCategory::Source);
    'batches: for (batch_idx, batch) in files.chunks(batch_size.max(1)).enumerate() {
        let absolute: Vec<PathBuf> = batch.iter().map(|meta| root.join(&meta.path)).collect();
        let display: HashMap<String, String> = absolute
            .iter()
            .zip(batch)
            .map(|(abs, meta)| (abs.to_string_lossy().into_owned(), meta.display_path()))
            .collect();

        tracing::debug!(batch = batch_idx, files = batch.len(), "running ctags batch");
        let groups = match tags.tag_batch(&absolute) {
            Ok(groups) => groups,
            Err(err) => {
                tracing::warn!("Symbol extraction stopped: {}", err);
                break;
            }
        };

        for group in groups {
            let content = group.content();
            let tokens = counter.count(&content);
            if !budget.can_afford(tokens) {
                tracing::info!(
                    path = %group.path,
                    tokens,
                    "token budget exhausted, stopping symbol extraction"
                );
                break 'batches;
            }
            budget.spend(tokens);

            let path = display
                .get(&group.path)
                .cloned()
                .unwrap_or_else(|| relative_to(root, Path::new(&group.path)));
            processed.append(ProcessedFile::new(path, FileCategory::Source, content));
        }
    }

    progress.on_complete(&format!("Generated code symbols for {} files.", processed.len()));
    Ok(processed)
}
