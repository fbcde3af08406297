//! Config file discovery and parsing

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Files probed in the repository root, first match wins.
pub const CONFIG_CANDIDATES: [&str; 6] = [
    "sential.toml",
    ".sential.toml",
    "sential.yml",
    ".sential.yml",
    "sential.yaml",
    ".sential.yaml",
];

/// Table or mapping key that may wrap the settings.
const NESTED_SECTION: &str = "sential";

/// Load config from `config_path`, or from the first discovered candidate.
///
/// An explicit file that fails to load is an error. A discovered one is
/// logged and replaced by defaults.
pub fn load_config(repo_root: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();
    let Some(config_file) = config_path
        .map(Path::to_path_buf)
        .or_else(|| discover_config(repo_root))
    else {
        return Ok(Config::default());
    };

    match parse_config_file(&config_file) {
        Ok(mut cfg) => {
            tracing::debug!(path = %config_file.display(), "loaded config");
            cfg.path = Some(config_file);
            Ok(cfg)
        }
        Err(err) if explicit => Err(err),
        Err(err) => {
            tracing::warn!("Ignoring auto-discovered config {}: {:#}", config_file.display(), err);
            Ok(Config::default())
        }
    }
}

pub fn discover_config(repo_root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|name| repo_root.join(name)).find(|path| path.is_file())
}

fn parse_config_file(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file),
        "yaml" | "yml" => parse_yaml_config(&content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let mut raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    if let Some(nested) = raw.as_table_mut().and_then(|table| table.remove(NESTED_SECTION)) {
        raw = nested;
    }
    raw.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let mut raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    if raw.is_null() {
        return Ok(Config::default());
    }
    if let Some(nested) = raw.get(NESTED_SECTION).cloned() {
        raw = nested;
    }
    serde_yaml::from_value(raw)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FileCategory, TokenizerKind};
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert!(cfg.path.is_none());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_discovered_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("sential.toml"),
            "language = 'go'\nbatch_size = 25\ntokenizer = 'estimate'\n[ratios]\nsource = 0.6\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.language.as_deref(), Some("go"));
        assert_eq!(cfg.batch_size, 25);
        assert_eq!(cfg.tokenizer, TokenizerKind::Estimate);
        assert_eq!(cfg.ratios.get(&FileCategory::Source), Some(&0.6));
        assert_eq!(cfg.path, Some(tmp.path().join("sential.toml")));
    }

    #[test]
    fn test_nested_toml_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[sential]\nmax_total_tokens = 5000\n").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.max_total_tokens, 5000);
    }

    #[test]
    fn test_nested_yaml_section() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(".sential.yml"),
            "sential:\n  scopes: api, web\n  exclude_globs:\n    - '**/gen/**'\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.scopes, vec!["api", "web"]);
        assert_eq!(cfg.exclude_globs, vec!["**/gen/**"]);
    }

    #[test]
    fn test_toml_wins_over_yaml_in_discovery() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("sential.yml"), "batch_size: 7\n").expect("write");
        fs::write(tmp.path().join("sential.toml"), "batch_size = 9\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.batch_size, 9);
    }

    #[test]
    fn test_explicit_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "scopes = 123\n").expect("write");

        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("sential.ini");
        fs::write(&path, "batch_size=1\n").expect("write");

        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        assert!(load_config(tmp.path(), Some(&tmp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("sential.toml"), "exclude_globs = false\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }
}
