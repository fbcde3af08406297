//! Repository file discovery

pub mod lister;
pub mod modules;

pub use lister::{is_git_repo, RepoLister};
pub use modules::{collapse_nested_scopes, discover_modules};
