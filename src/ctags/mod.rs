//! Universal Ctags integration
//!
//! Locates the tagging binary and runs it over batches of files, streaming
//! its JSON output into per-file symbol groups.

use crate::error::CtagsError;
use globset::Glob;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub mod parse;

pub use parse::{parse_tag_line, LossyLines, TagGroup, TagGroups};

/// Produces symbol groups for a batch of files.
pub trait TagSource {
    /// Tag every file in `paths`. Groups come back in tool output order with
    /// paths exactly as the tool reported them.
    fn tag_batch(&self, paths: &[PathBuf]) -> Result<Vec<TagGroup>, CtagsError>;
}

/// Runs the ctags executable once per batch.
#[derive(Debug, Clone)]
pub struct CtagsRunner {
    program: PathBuf,
}

impl CtagsRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, paths: &[PathBuf]) -> Command {
        let mut cmd = Command::new(&self.program);
        // JSON lines with line numbers, in file order, written to stdout
        cmd.args(["--output-format=json", "--sort=no", "--fields=+n", "-f", "-"]);
        cmd.args(paths);
        // stderr is discarded so a chatty tool can never fill an unread pipe
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::null());
        cmd
    }
}

impl TagSource for CtagsRunner {
    fn tag_batch(&self, paths: &[PathBuf]) -> Result<Vec<TagGroup>, CtagsError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let mut child = self
            .command(paths)
            .spawn()
            .map_err(|source| CtagsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CtagsError::Stream(std::io::Error::other("ctags stdout was not captured")));
        };

        // Drain stdout to end of stream before waiting on the process.
        let groups: std::io::Result<Vec<TagGroup>> =
            TagGroups::new(LossyLines::new(BufReader::new(stdout))).collect();

        match groups {
            Ok(groups) => {
                let status = child.wait()?;
                if !status.success() {
                    tracing::debug!(
                        "{} exited with {} after tagging {} files",
                        self.program.display(),
                        status,
                        groups.len()
                    );
                }
                Ok(groups)
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(CtagsError::Stream(err))
            }
        }
    }
}

/// Find the ctags binary.
///
/// Order: the configured path, a bundled `bin/ctags-{os}-{arch}-*` next to
/// the running executable, then `ctags` on `PATH`.
pub fn locate_ctags(configured: Option<&Path>) -> Result<PathBuf, CtagsError> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(CtagsError::NotFound(format!(
            "configured ctags path does not exist: {}",
            path.display()
        )));
    }

    let bundled_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("bin")));
    if let Some(found) = bundled_dir.as_deref().and_then(find_bundled) {
        return Ok(found);
    }

    which::which("ctags").map_err(|err| {
        CtagsError::NotFound(format!(
            "Universal Ctags not found in PATH; install it or set ctags_path. Error: {err}"
        ))
    })
}

/// Newest bundled binary in `bin_dir` for this platform.
///
/// Several versions may sit side by side; the lexicographically last name wins.
pub fn find_bundled(bin_dir: &Path) -> Option<PathBuf> {
    let system = normalize_system(std::env::consts::OS);
    let arch = normalize_architecture(&system, std::env::consts::ARCH);
    find_bundled_for(bin_dir, &binary_pattern(&system, &arch))
}

fn find_bundled_for(bin_dir: &Path, pattern: &str) -> Option<PathBuf> {
    let matcher = Glob::new(pattern).ok()?.compile_matcher();
    let mut matches: Vec<PathBuf> = std::fs::read_dir(bin_dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
        .collect();
    matches.sort();
    matches.pop()
}

pub fn normalize_system(os: &str) -> String {
    match os {
        "macos" | "darwin" => "macos".to_string(),
        other => other.to_lowercase(),
    }
}

pub fn normalize_architecture(system: &str, machine: &str) -> String {
    let machine = machine.to_lowercase();
    if machine.contains("arm") || machine.contains("aarch64") {
        let arch = if system == "macos" { "arm64" } else { "aarch64" };
        arch.to_string()
    } else {
        "x86_64".to_string()
    }
}

pub fn binary_pattern(system: &str, arch: &str) -> String {
    if system == "windows" {
        format!("ctags-{system}-{arch}-*.exe")
    } else {
        format!("ctags-{system}-{arch}-*")
    }
}
