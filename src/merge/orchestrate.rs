//! Merge orchestration - effectful sequencing over the gateway
//!
//! Two entry points: merge an existing request (resolve mergeability, then
//! issue the destructive merge call) and create a new one (resolve the
//! target project, default branches, then create). Resolution failures
//! propagate unchanged rather than being wrapped or retried here.

use crate::error::{Error, Result};
use crate::gitlab::GitLabGateway;
use crate::merge::resolve::wait_for_mergeability;
use crate::types::{GitlabProject, MergeOutcome, PollPolicy};
use std::sync::Arc;
use tracing::{debug, info};

/// Fallback when a project has no default branch recorded
const FALLBACK_TARGET_BRANCH: &str = "main";

/// Inputs for the create path.
///
/// Either `project_id` or `project_name` must identify the project;
/// `source_branch` is required, `target_branch` defaults to the project's
/// default branch.
#[derive(Debug, Clone, Default)]
pub struct CreateMergeRequest {
    /// Numeric project id; takes priority over the name
    pub project_id: Option<u64>,
    /// Project name for fuzzy lookup when no id is given
    pub project_name: Option<String>,
    /// Branch to merge from
    pub source_branch: Option<String>,
    /// Branch to merge into
    pub target_branch: Option<String>,
}

/// Sequences merge-request creation and merging over an injected gateway
pub struct MergeOrchestrator {
    gateway: Arc<dyn GitLabGateway>,
    policy: PollPolicy,
}

impl MergeOrchestrator {
    /// Create an orchestrator over the given gateway and polling policy.
    pub fn new(gateway: Arc<dyn GitLabGateway>, policy: PollPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Merge an existing merge request once it becomes mergeable.
    ///
    /// The merge call is only reached after the resolver observes a Ready
    /// classification; blocked and timed-out resolutions surface unchanged.
    /// The status can still change between the last check and the merge call
    /// itself - the external system owns that window.
    pub async fn merge_existing(&self, project_id: u64, iid: u64) -> Result<MergeOutcome> {
        wait_for_mergeability(self.gateway.as_ref(), project_id, iid, &self.policy).await?;

        let merged = self.gateway.merge_merge_request(project_id, iid).await?;
        info!(project_id, mr_iid = iid, url = %merged.web_url, "merge request merged");

        Ok(MergeOutcome::Merged {
            web_url: merged.web_url,
        })
    }

    /// Create a new merge request.
    ///
    /// An ambiguous name lookup returns [`MergeOutcome::Disambiguation`]
    /// without creating anything, handing the choice back to the caller.
    pub async fn create(&self, request: CreateMergeRequest) -> Result<MergeOutcome> {
        let project = match self.resolve_project(&request).await? {
            Resolved::One(project) => project,
            Resolved::Many(candidates) => {
                debug!(count = candidates.len(), "ambiguous project name");
                return Ok(MergeOutcome::Disambiguation { candidates });
            }
        };

        let source_branch = request
            .source_branch
            .as_deref()
            .filter(|branch| !branch.is_empty())
            .ok_or(Error::SourceBranchRequired)?;

        let target_branch = request
            .target_branch
            .as_deref()
            .filter(|branch| !branch.is_empty())
            .unwrap_or_else(|| {
                project
                    .default_branch
                    .as_deref()
                    .unwrap_or(FALLBACK_TARGET_BRANCH)
            });

        let title = format!("Merge {source_branch} into {target_branch} via devbot");

        let created = self
            .gateway
            .create_merge_request(project.id, source_branch, target_branch, &title)
            .await?;
        info!(
            project_id = project.id,
            mr_iid = created.iid,
            url = %created.web_url,
            "merge request created"
        );

        Ok(MergeOutcome::Created {
            iid: created.iid,
            web_url: created.web_url,
        })
    }

    /// Resolve the target project by id, or by name with zero/one/many
    /// handling.
    async fn resolve_project(&self, request: &CreateMergeRequest) -> Result<Resolved> {
        if let Some(id) = request.project_id {
            return Ok(Resolved::One(self.gateway.get_project(id).await?));
        }

        let name = request
            .project_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::InvalidRequest("project id or name must be given".to_string()))?;

        let mut projects = self.gateway.search_projects(name).await?;

        match projects.len() {
            0 => Err(Error::ProjectNotFound(name.to_string())),
            1 => Ok(Resolved::One(projects.remove(0))),
            _ => Ok(Resolved::Many(projects)),
        }
    }
}

enum Resolved {
    One(GitlabProject),
    Many(Vec<GitlabProject>),
}
