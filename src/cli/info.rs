//! Info command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::{is_interactive_session, parse_csv, resolve_language, resolve_root};
use crate::config::{resolve_config, CliOverrides};
use crate::ctags::locate_ctags;
use crate::domain::FileCategory;
use crate::progress::NoProgress;
use crate::rank::{categorize_files, relevant_count, sort_for_processing};
use crate::scan::{discover_modules, is_git_repo, RepoLister};

const TOP_FILES_PER_CATEGORY: usize = 5;

#[derive(Args)]
pub struct InfoArgs {
    /// Repository directory to analyze
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Repository language: python, javascript, java, csharp, go, cpp
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Path to config file (sential.toml or .sential.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Restrict to these directories (comma-separated, relative to PATH)
    #[arg(short = 's', long, value_name = "DIRS")]
    pub scope: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let root = resolve_root(&args.path)?;
    if !is_git_repo(&root) {
        anyhow::bail!("Not a git repository: '{}'", root.display());
    }

    let overrides = CliOverrides {
        language: args.language.clone(),
        scopes: parse_csv(&args.scope),
        exclude_globs: parse_csv(&args.exclude_glob),
        ..CliOverrides::default()
    };
    let config = resolve_config(&root, args.config.as_deref(), overrides)?;
    let language = resolve_language(config.language.as_deref(), is_interactive_session())?;
    let profile = language.profile();

    let paths = RepoLister::new(&root)
        .scopes(config.scopes.clone())
        .exclude_globs(config.exclude_globs.clone())
        .list()?;
    let mut by_category = categorize_files(&paths, profile, &NoProgress);

    let repo_name = root.file_name().and_then(|n| n.to_str()).unwrap_or("");
    println!("Repository: {}", repo_name);
    println!("Language: {}", language.display_name());
    if let Some(config_path) = &config.path {
        println!("Config: {}", config_path.display());
    }
    match locate_ctags(config.ctags_path.as_deref()) {
        Ok(path) => println!("Ctags: {}", path.display()),
        Err(err) => println!("Ctags: not available ({})", err),
    }

    let modules = discover_modules(&paths, profile);
    if !modules.is_empty() {
        println!("Modules:");
        for module in &modules {
            println!("  {}", module);
        }
    }

    println!("Files:");
    println!("  Total discovered: {}", paths.len());
    println!("  Relevant: {}", relevant_count(&by_category));
    for category in FileCategory::ALL {
        let count = by_category.get(&category).map(Vec::len).unwrap_or(0);
        println!("  {}: {}", category.label(), count);
    }

    println!("Processing order (top {} per category):", TOP_FILES_PER_CATEGORY);
    for category in FileCategory::PROCESSING_ORDER {
        let Some(files) = by_category.get_mut(&category).filter(|files| !files.is_empty()) else {
            continue;
        };
        sort_for_processing(files);
        println!("  {}:", category.label());
        for meta in files.iter().take(TOP_FILES_PER_CATEGORY) {
            println!("    {} (score {})", meta.display_path(), meta.score);
        }
    }

    Ok(())
}
