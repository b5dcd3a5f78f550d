//! devbot - MCP server exposing TAPD, Jenkins and GitLab chat tools
//!
//! Most tools are request construction and response formatting over the
//! service clients. The exception is the merge flow in [`merge`]: a pure
//! status classifier, a time-bounded polling resolver around it, and an
//! orchestrator that only issues the destructive merge call after a Ready
//! classification.

pub mod config;
pub mod error;
pub mod gitlab;
pub mod jenkins;
pub mod merge;
pub mod server;
pub mod tapd;
pub mod types;
