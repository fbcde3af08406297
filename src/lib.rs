//! sential: significance-ranked, token-budgeted repository digests
//!
//! Files are scored and grouped into categories, then extracted category by
//! category against one shared token pool: full text for context, manifest
//! and entry-point files, ctags symbol outlines for the remaining sources.

pub mod cli;
pub mod config;
pub mod ctags;
pub mod domain;
pub mod error;
pub mod extract;
pub mod progress;
pub mod rank;
pub mod render;
pub mod scan;
pub mod tokens;
pub mod utils;
