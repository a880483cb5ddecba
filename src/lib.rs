// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::ingest::types::{FetchOutcome, ProviderId, RecencyWindow, Snippet, SourceProvider};
pub use crate::ingest::{compile_all, Corpus, NO_UPDATES};
pub use crate::notify::{deliver, DeliveryError, Notifier};
pub use crate::pipeline::{run_once, run_once_at, Pipeline, RunSummary};
pub use crate::report::{Report, ReportComposer};
pub use crate::summarize::{summarize, GenerationBackend, SummaryFailure, SummaryResult};
