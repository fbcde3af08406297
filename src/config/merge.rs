//! Layering of environment and CLI values over file config

use crate::domain::{Config, TokenizerKind};
use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "SENTIAL_";

/// Values given on the command line. `None` leaves the config untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub language: Option<String>,
    pub max_total_tokens: Option<usize>,
    pub batch_size: Option<usize>,
    pub ctags_path: Option<PathBuf>,
    pub tokenizer: Option<TokenizerKind>,
    pub tokenizer_model: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub exclude_globs: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Overlay `SENTIAL_*` environment variables onto `config`.
pub fn apply_env_overrides(config: Config) -> Result<Config> {
    merge_env(config, ENV_PREFIX)
}

fn merge_env(config: Config, prefix: &str) -> Result<Config> {
    let path = config.path.clone();
    let merged: Config = Figment::from(Serialized::defaults(&config))
        .merge(Env::prefixed(prefix).ignore(&["path"]))
        .extract()
        .with_context(|| format!("Invalid {prefix}* environment override"))?;
    Ok(Config { path, ..merged })
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(language) = cli.language {
        config.language = Some(language);
    }
    if let Some(max_total_tokens) = cli.max_total_tokens {
        config.max_total_tokens = max_total_tokens;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(ctags_path) = cli.ctags_path {
        config.ctags_path = Some(ctags_path);
    }
    if let Some(tokenizer) = cli.tokenizer {
        config.tokenizer = tokenizer;
    }
    if let Some(model) = cli.tokenizer_model {
        config.tokenizer_model = model;
    }
    if let Some(scopes) = cli.scopes {
        config.scopes = scopes;
    }
    if let Some(globs) = cli.exclude_globs {
        config.exclude_globs = globs;
    }
    if let Some(output) = cli.output {
        config.output = Some(output);
    }
    if let Some(report) = cli.report {
        config.report = Some(report);
    }
    config
}

/// File, then environment, then CLI, validated.
pub fn resolve_config(
    repo_root: &Path,
    config_path: Option<&Path>,
    cli: CliOverrides,
) -> Result<Config> {
    let file_config = super::load_config(repo_root, config_path)?;
    let config = merge_cli_with_config(apply_env_overrides(file_config)?, cli);
    config.validate()?;
    Ok(config)
}
