//! Token counting and budget management

pub mod budget;
pub mod counter;

pub use budget::{PooledTokenBudget, TokenBudget, TokenLimits};
pub use counter::{FixedTokenCounter, HeuristicCounter, TiktokenCounter, TokenCounter};

use crate::domain::TokenizerKind;

/// Build the counter selected in config.
pub fn build_counter(kind: TokenizerKind, model: &str) -> anyhow::Result<Box<dyn TokenCounter>> {
    Ok(match kind {
        TokenizerKind::Tiktoken => Box::new(TiktokenCounter::new(model)?),
        TokenizerKind::Estimate => Box::new(HeuristicCounter),
    })
}
