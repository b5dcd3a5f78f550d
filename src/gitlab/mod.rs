//! GitLab integration
//!
//! The merge core talks to GitLab exclusively through the [`GitLabGateway`]
//! trait so tests can substitute a scripted gateway for the HTTP client.

mod client;

pub use client::GitLabClient;

use crate::error::Result;
use crate::types::{GitlabProject, MergeRequestRef, MergeRequestSnapshot};
use async_trait::async_trait;

/// Transport operations the merge flow needs from GitLab
///
/// Every method is one authenticated API round trip. Transport failures are
/// the implementor's to report and are never retried by callers; only the
/// classifier's view of a successfully fetched snapshot drives retry.
#[async_trait]
pub trait GitLabGateway: Send + Sync {
    /// Fetch a fresh mergeability snapshot of one merge request
    async fn fetch_merge_request(
        &self,
        project_id: u64,
        iid: u64,
    ) -> Result<MergeRequestSnapshot>;

    /// Look up a project by its numeric id
    async fn get_project(&self, project_id: u64) -> Result<GitlabProject>;

    /// Fuzzy-search projects by name
    async fn search_projects(&self, name: &str) -> Result<Vec<GitlabProject>>;

    /// Create a merge request
    async fn create_merge_request(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
        title: &str,
    ) -> Result<MergeRequestRef>;

    /// Merge an existing merge request. Destructive; callers gate this behind
    /// a Ready classification.
    async fn merge_merge_request(&self, project_id: u64, iid: u64) -> Result<MergeRequestRef>;
}
