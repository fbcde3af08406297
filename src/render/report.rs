//! Run report JSON generation.

use crate::domain::{FileCategory, REPORT_SCHEMA_VERSION};
use crate::extract::ProcessedByCategory;
use crate::rank::FilesByCategory;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub candidates: usize,
    pub processed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub language: String,
    pub files_discovered: usize,
    pub categories: BTreeMap<FileCategory, CategorySummary>,
    pub tokens_spent: usize,
    pub final_pool: i64,
    pub payload: String,
}

/// Candidate counts per category, taken before extraction consumes the map.
pub fn candidate_counts(by_category: &FilesByCategory) -> BTreeMap<FileCategory, usize> {
    by_category.iter().map(|(category, files)| (*category, files.len())).collect()
}

impl RunSummary {
    pub fn new(
        language: &str,
        files_discovered: usize,
        candidates: &BTreeMap<FileCategory, usize>,
        results: &ProcessedByCategory,
    ) -> Self {
        let categories = FileCategory::ALL
            .iter()
            .map(|category| {
                let summary = CategorySummary {
                    candidates: candidates.get(category).copied().unwrap_or(0),
                    processed: results.get(category).map(|r| r.len()).unwrap_or(0),
                };
                (*category, summary)
            })
            .collect();

        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: None,
            language: language.to_string(),
            files_discovered,
            categories,
            tokens_spent: 0,
            final_pool: 0,
            payload: String::new(),
        }
    }

    pub fn with_budget(mut self, tokens_spent: usize, final_pool: i64) -> Self {
        self.tokens_spent = tokens_spent;
        self.final_pool = final_pool;
        self
    }

    pub fn with_payload(mut self, payload: &Path) -> Self {
        self.payload = crate::utils::normalize_path(&payload.to_string_lossy());
        self
    }

    pub fn with_timestamp(mut self) -> Self {
        self.generated_at = Some(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string());
        self
    }

    pub fn processed_total(&self) -> usize {
        self.categories.values().map(|c| c.processed).sum()
    }
}

pub fn write_report(report_path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(summary)?)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    Ok(())
}
