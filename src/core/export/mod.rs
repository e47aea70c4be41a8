//! Export orchestration
//!
//! Drives one run: open the output file, stream the range in chunks,
//! transform, commit, and report.

pub mod orchestrator;
pub mod summary;

pub use orchestrator::{ExportOrchestrator, RunState, CHUNK_SIZE};
pub use summary::ExportResult;
