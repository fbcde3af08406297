//! Digest command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use std::path::{Path, PathBuf};

use super::progress::TerminalProgress;
use super::prompts;
use super::utils::{is_interactive_session, parse_csv, resolve_language, resolve_root};
use crate::config::{resolve_config, CliOverrides};
use crate::ctags::{locate_ctags, CtagsRunner};
use crate::domain::{Config, SupportedLanguage, TokenizerKind};
use crate::error::CtagsError;
use crate::extract::Extraction;
use crate::rank::categorize_files;
use crate::render::{candidate_counts, write_payload, write_report, RunSummary};
use crate::scan::{discover_modules, is_git_repo, RepoLister};
use crate::tokens::{build_counter, PooledTokenBudget, TokenLimits};

pub const DEFAULT_PAYLOAD_NAME: &str = "sential_payload.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenizerArg {
    /// BPE token counts for the configured model
    Tiktoken,
    /// Fast estimate of characters divided by four
    Estimate,
}

impl From<TokenizerArg> for TokenizerKind {
    fn from(arg: TokenizerArg) -> Self {
        match arg {
            TokenizerArg::Tiktoken => TokenizerKind::Tiktoken,
            TokenizerArg::Estimate => TokenizerKind::Estimate,
        }
    }
}

#[derive(Args)]
pub struct DigestArgs {
    /// Repository directory to digest (must be inside a git work tree)
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Repository language: python, javascript, java, csharp, go, cpp
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Path to config file (sential.toml or .sential.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Total token budget shared by all categories
    #[arg(short = 't', long, value_name = "TOKENS")]
    pub max_tokens: Option<usize>,

    /// Files handed to each ctags invocation
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Universal Ctags executable to use
    #[arg(long, value_name = "FILE")]
    pub ctags: Option<PathBuf>,

    /// Token counting strategy
    #[arg(long, value_enum)]
    pub tokenizer: Option<TokenizerArg>,

    /// Model whose BPE encoding is used for token counts
    #[arg(long, value_name = "MODEL")]
    pub tokenizer_model: Option<String>,

    /// Restrict to these directories (comma-separated, relative to PATH)
    #[arg(short = 's', long, value_name = "DIRS")]
    pub scope: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Payload output path [default: <tmp>/sential_payload.jsonl]
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write a JSON run report here
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Include every module without asking
    #[arg(long)]
    pub all: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl DigestArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            language: self.language.clone(),
            max_total_tokens: self.max_tokens,
            batch_size: self.batch_size,
            ctags_path: self.ctags.clone(),
            tokenizer: self.tokenizer.map(TokenizerKind::from),
            tokenizer_model: self.tokenizer_model.clone(),
            scopes: parse_csv(&self.scope),
            exclude_globs: parse_csv(&self.exclude_glob),
            output: self.output.clone(),
            report: self.report.clone(),
        }
    }
}

pub fn run(args: DigestArgs) -> Result<()> {
    let root = resolve_root(&args.path)?;
    if !is_git_repo(&root) {
        anyhow::bail!("Not a git repository: '{}'", root.display());
    }

    let interactive = is_interactive_session();
    let config = resolve_config(&root, args.config.as_deref(), args.overrides())?;
    let language = resolve_language(config.language.as_deref(), interactive)?;
    let profile = language.profile();

    if !args.quiet {
        eprintln!("{} {}", style("Language selected:").green(), language.display_name());
        eprintln!("{} {}", style("Scanning:").green(), root.display());
    }

    let paths = list_files(&root, &config, language, interactive && !args.all)?;

    let progress = TerminalProgress::new(!args.quiet);
    let by_category = categorize_files(&paths, profile, &progress);
    let candidates = candidate_counts(&by_category);

    let counter = build_counter(config.tokenizer, &config.tokenizer_model)?;
    let runner = CtagsRunner::new(ctags_program(config.ctags_path.as_deref())?);
    let limits = TokenLimits::new(config.max_total_tokens, config.ratios.clone());
    let mut budget = PooledTokenBudget::new(limits);

    let results = Extraction::new(&root, &*counter, &runner)
        .with_progress(&progress)
        .with_batch_size(config.batch_size)
        .process_files(by_category, &mut budget)?;

    let output = config.output.clone().unwrap_or_else(default_output_path);
    write_payload(&output, &results, &paths)?;

    let summary = RunSummary::new(language.display_name(), paths.len(), &candidates, &results)
        .with_budget(budget.spent(), budget.pool())
        .with_payload(&output);
    if let Some(report_path) = &config.report {
        write_report(report_path, &summary.clone().with_timestamp())?;
    }

    if !args.quiet {
        eprintln!(
            "{} {} files, {} tokens",
            style("Digest complete:").green().bold(),
            summary.processed_total(),
            summary.tokens_spent
        );
    }
    println!("{}", output.display());
    Ok(())
}

pub fn default_output_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_PAYLOAD_NAME)
}

/// List the repository, asking for module scopes when none are configured
/// and `ask_scopes` allows it.
fn list_files(
    root: &Path,
    config: &Config,
    language: SupportedLanguage,
    ask_scopes: bool,
) -> Result<Vec<String>> {
    let lister = RepoLister::new(root).exclude_globs(config.exclude_globs.clone());
    if !config.scopes.is_empty() {
        return lister.scopes(config.scopes.clone()).list();
    }

    let paths = lister.list()?;
    if !ask_scopes {
        return Ok(paths);
    }

    let modules = discover_modules(&paths, language.profile());
    if modules.is_empty() {
        tracing::warn!("No {} modules found in {}", language.display_name(), root.display());
        return Ok(paths);
    }
    if modules.len() == 1 {
        return Ok(paths);
    }

    let scopes = prompts::select_scopes(&modules)?;
    if scopes.iter().any(|scope| scope == ".") {
        return Ok(paths);
    }
    RepoLister::new(root).exclude_globs(config.exclude_globs.clone()).scopes(scopes).list()
}

/// Resolve the ctags executable. A configured path that does not exist is an
/// error; a missing default install only disables symbol extraction.
fn ctags_program(configured: Option<&Path>) -> Result<PathBuf> {
    match locate_ctags(configured) {
        Ok(path) => {
            tracing::debug!(ctags = %path.display(), "using ctags");
            Ok(path)
        }
        Err(err @ CtagsError::NotFound(_)) if configured.is_some() => {
            Err(err).context("Invalid ctags_path")
        }
        Err(err) => {
            tracing::warn!("{}; source files will have no symbols", err);
            Ok(PathBuf::from("ctags"))
        }
    }
}
