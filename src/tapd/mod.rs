//! TAPD integration
//!
//! A thin client over the TAPD REST API plus the pure per-owner task
//! aggregation used for progress summaries.

mod client;
mod stats;

pub use client::{TapdClient, TapdTask, TapdUser};
pub use stats::{group_tasks_by_owner, OwnerStatistics, TaskReport};
