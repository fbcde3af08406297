//! Git-backed repository file listing
//!
//! Lists what `git ls-files --cached --others --exclude-standard` would from
//! the requested root: tracked files plus untracked files that no ignore
//! rule excludes.

use crate::utils::normalize_path;
use anyhow::{Context, Result};
use git2::{Repository, Status, StatusOptions};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Index mode for submodule entries.
const GITLINK_MODE: u32 = 0o160000;

pub struct RepoLister {
    root: PathBuf,
    scopes: Vec<String>,
    exclude_globs: Vec<String>,
}

impl RepoLister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scopes: Vec::new(),
            exclude_globs: Vec::new(),
        }
    }

    /// Restrict listing to these root-relative directories. `.` means everything.
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Drop paths matching any of these globs.
    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    /// Every eligible path relative to the root, sorted and deduplicated.
    pub fn list(&self) -> Result<Vec<String>> {
        let repo = Repository::discover(&self.root)
            .with_context(|| format!("Not a git repository: {}", self.root.display()))?;
        let workdir = repo
            .workdir()
            .with_context(|| format!("Repository has no working tree: {}", self.root.display()))?;

        let workdir = workdir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", workdir.display()))?;
        let root = self
            .root
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", self.root.display()))?;
        let prefix = root
            .strip_prefix(&workdir)
            .map(|p| normalize_path(&p.to_string_lossy()))
            .unwrap_or_default();

        let mut repo_paths = BTreeSet::new();

        let index = repo.index().context("Failed to read git index")?;
        for entry in index.iter() {
            if entry.mode == GITLINK_MODE {
                continue;
            }
            repo_paths.insert(String::from_utf8_lossy(&entry.path).into_owned());
        }

        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true).include_ignored(false);
        let statuses = repo.statuses(Some(&mut opts)).context("Failed to read git status")?;
        for entry in statuses.iter() {
            if !entry.status().contains(Status::WT_NEW) {
                continue;
            }
            if let Some(path) = entry.path() {
                repo_paths.insert(path.to_string());
            }
        }

        let excludes = build_exclude_globset(&self.exclude_globs)?;
        let scopes = normalize_scopes(&self.scopes);

        let paths: Vec<String> = repo_paths
            .iter()
            .filter_map(|path| strip_root_prefix(path, &prefix))
            .filter(|path| in_scopes(path, &scopes))
            .filter(|path| !excludes.is_match(path))
            .collect();

        tracing::debug!(root = %root.display(), files = paths.len(), "listed repository files");
        Ok(paths)
    }
}

/// True when `path` sits inside a git working tree.
pub fn is_git_repo(path: &Path) -> bool {
    Repository::discover(path).map(|repo| repo.workdir().is_some()).unwrap_or(false)
}

fn strip_root_prefix(path: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return Some(path.to_string());
    }
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

fn normalize_scopes(scopes: &[String]) -> Vec<String> {
    let normalized: Vec<String> = scopes
        .iter()
        .map(|scope| normalize_path(scope.trim()))
        .map(|scope| scope.trim_start_matches("./").trim_end_matches('/').to_string())
        .collect();
    if normalized.iter().any(|scope| scope.is_empty() || scope == ".") {
        return Vec::new();
    }
    normalized
}

fn in_scopes(path: &str, scopes: &[String]) -> bool {
    scopes.is_empty()
        || scopes.iter().any(|scope| {
            path.strip_prefix(scope.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
}

fn build_exclude_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => tracing::warn!("Ignoring invalid exclude glob '{}': {}", pattern, err),
        }
    }
    Ok(builder.build()?)
}
