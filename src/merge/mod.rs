//! Merge-request orchestration core
//!
//! Three layers, pure first:
//! 1. Classify - one snapshot in, one decision out (pure, testable)
//! 2. Resolve - time-bounded polling driver around classify (effectful, bounded)
//! 3. Orchestrate - project resolution, creation and the merge call (effectful)

mod classify;
mod orchestrate;
mod resolve;

pub use classify::{classify, Decision, ReasonCode};
pub use orchestrate::{CreateMergeRequest, MergeOrchestrator};
pub use resolve::wait_for_mergeability;
