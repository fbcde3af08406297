//! sential: digest a repository into a token-budgeted JSONL payload

use anyhow::Result;

fn main() -> Result<()> {
    sential::cli::run()
}
