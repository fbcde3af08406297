//! Shared CLI utilities.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use super::prompts;
use crate::domain::SupportedLanguage;

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

pub fn is_interactive_session() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Canonical repository root, which must be an existing directory.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let root = path.canonicalize().with_context(|| format!("Path not found: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }
    Ok(root)
}

/// Language from config, or from a prompt when the session is interactive.
pub fn resolve_language(configured: Option<&str>, interactive: bool) -> Result<SupportedLanguage> {
    match configured.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse::<SupportedLanguage>().map_err(|_| {
            anyhow::anyhow!(
                "Selected language not supported ('{}'). Supported languages: {}",
                value,
                supported_language_list()
            )
        }),
        None if interactive => prompts::select_language(),
        None => anyhow::bail!(
            "No language given; pass --language (one of: {})",
            supported_language_list()
        ),
    }
}

pub fn supported_language_list() -> String {
    SupportedLanguage::ALL.iter().map(|lang| lang.id()).collect::<Vec<_>>().join(", ")
}
