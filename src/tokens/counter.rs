//! Token counting
//!
//! Production runs use a BPE encoder; tests plug in fixed or closure counters.

use anyhow::Result;
use tiktoken_rs::CoreBPE;

pub trait TokenCounter {
    /// Tokens the text costs. Empty text costs nothing.
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// BPE token counter backed by `tiktoken-rs`.
pub struct TiktokenCounter {
    encoder: CoreBPE,
}

impl TiktokenCounter {
    /// Encoder for `model`, falling back to `cl100k_base` for unknown models.
    pub fn new(model: &str) -> Result<Self> {
        let encoder = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(encoder) => encoder,
            Err(err) => {
                tracing::debug!("unknown tokenizer model {model} ({err}); using cl100k_base");
                tiktoken_rs::cl100k_base()?
            }
        };
        Ok(Self { encoder })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.encoder.encode_with_special_tokens(text).len()
    }
}

/// Estimate tokens using a simple heuristic (chars / 4).
///
/// Counts Unicode code points, not bytes, so multi-byte text is not
/// over-counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count() / 4
    }
}

/// Returns the same count for every non-empty text.
#[derive(Debug, Clone, Copy)]
pub struct FixedTokenCounter(pub usize);

impl TokenCounter for FixedTokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            0
        } else {
            self.0
        }
    }
}
