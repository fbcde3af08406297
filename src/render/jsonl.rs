//! JSONL payload rendering

use crate::domain::{FileCategory, ProcessedFile};
use crate::extract::ProcessedByCategory;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const FILE_PATHS_RECORD_TYPE: &str = "file_paths";

/// One line per processed file in category order, then a `file_paths`
/// record listing every discovered path.
pub fn render_payload(results: &ProcessedByCategory, all_paths: &[String]) -> Result<String> {
    let mut lines = Vec::new();
    for category in FileCategory::PROCESSING_ORDER {
        let Some(processed) = results.get(&category) else {
            continue;
        };
        for file in &processed.files {
            lines.push(render_record(file)?);
        }
    }

    // BTreeMap keeps keys in alphabetical order across every record.
    let mut paths_entry: BTreeMap<&str, Value> = BTreeMap::new();
    paths_entry.insert("paths", serde_json::to_value(all_paths)?);
    paths_entry.insert("type", Value::String(FILE_PATHS_RECORD_TYPE.to_string()));
    lines.push(serde_json::to_string(&paths_entry)?);

    Ok(format!("{}\n", lines.join("\n")))
}

fn render_record(file: &ProcessedFile) -> Result<String> {
    let mut entry: BTreeMap<&str, Value> = BTreeMap::new();
    entry.insert("content", Value::String(file.content.clone()));
    entry.insert("path", Value::String(file.path.clone()));
    entry.insert("type", Value::String(file.kind.clone()));
    Ok(serde_json::to_string(&entry)?)
}

pub fn write_payload(
    output: &Path,
    results: &ProcessedByCategory,
    all_paths: &[String],
) -> Result<()> {
    let payload = render_payload(results, all_paths)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(output, payload)
        .with_context(|| format!("Failed to write payload {}", output.display()))?;
    Ok(())
}
