//! Output rendering (JSONL payload, run report)

pub mod jsonl;
pub mod report;

pub use jsonl::{render_payload, write_payload};
pub use report::{candidate_counts, write_report, RunSummary};
