//! Run configuration

use super::FileCategory;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_MAX_TOTAL_TOKENS: usize = 200_000;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-4o";
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

pub fn default_ratios() -> BTreeMap<FileCategory, f64> {
    BTreeMap::from([
        (FileCategory::Context, 0.10),
        (FileCategory::Manifest, 0.05),
        (FileCategory::Signal, 0.05),
        (FileCategory::Source, 0.40),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// BPE encoder for the configured model.
    #[default]
    Tiktoken,
    /// Characters divided by four.
    Estimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub path: Option<PathBuf>,
    pub language: Option<String>,
    pub max_total_tokens: usize,
    pub ratios: BTreeMap<FileCategory, f64>,
    pub batch_size: usize,
    pub ctags_path: Option<PathBuf>,
    pub tokenizer: TokenizerKind,
    pub tokenizer_model: String,
    #[serde(deserialize_with = "string_or_list")]
    pub scopes: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub exclude_globs: Vec<String>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            language: None,
            max_total_tokens: DEFAULT_MAX_TOTAL_TOKENS,
            ratios: default_ratios(),
            batch_size: DEFAULT_BATCH_SIZE,
            ctags_path: None,
            tokenizer: TokenizerKind::default(),
            tokenizer_model: DEFAULT_TOKENIZER_MODEL.to_string(),
            scopes: Vec::new(),
            exclude_globs: Vec::new(),
            output: None,
            report: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        if self.max_total_tokens == 0 {
            anyhow::bail!("max_total_tokens must be greater than 0");
        }
        for (category, ratio) in &self.ratios {
            if !ratio.is_finite() || *ratio < 0.0 {
                anyhow::bail!("Invalid ratio for {}: {}", category, ratio);
            }
        }
        Ok(())
    }
}

/// Accept either a TOML/YAML list or a comma-separated string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(value) => value.split(',').map(str::to_string).collect::<Vec<_>>(),
        StringOrList::Many(values) => values,
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
