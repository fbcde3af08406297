//! Configuration loading and merging
//!
//! Precedence is CLI > Env > File > Defaults.

pub mod loader;
pub mod merge;

pub use loader::{discover_config, load_config};
pub use merge::{apply_env_overrides, merge_cli_with_config, resolve_config, CliOverrides};
