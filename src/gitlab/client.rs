//! GitLab gateway implementation using reqwest

use crate::error::{Error, Result};
use crate::gitlab::GitLabGateway;
use crate::types::{GitlabProject, MergeRequestRef, MergeRequestSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitLab REST v4 client
pub struct GitLabClient {
    client: Client,
    token: String,
    base_url: String,
}

#[derive(Serialize)]
struct CreateMrPayload<'a> {
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
}

/// Subset of the merge request payload returned by mutating calls
#[derive(Deserialize)]
struct MrRefPayload {
    iid: u64,
    web_url: String,
}

impl From<MrRefPayload> for MergeRequestRef {
    fn from(mr: MrRefPayload) -> Self {
        Self {
            iid: mr.iid,
            web_url: mr.web_url,
        }
    }
}

impl GitLabClient {
    /// Create a new GitLab client for an instance base URL such as
    /// `https://gitlab.example.com`.
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{path}", self.base_url)
    }
}

#[async_trait]
impl GitLabGateway for GitLabClient {
    async fn fetch_merge_request(
        &self,
        project_id: u64,
        iid: u64,
    ) -> Result<MergeRequestSnapshot> {
        debug!(project_id, mr_iid = iid, "fetching MR snapshot");
        let url = self.api_url(&format!("/projects/{project_id}/merge_requests/{iid}"));

        let snapshot: MergeRequestSnapshot = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(
            project_id,
            mr_iid = iid,
            state = %snapshot.state,
            detailed = ?snapshot.detailed_merge_status,
            "fetched MR snapshot"
        );
        Ok(snapshot)
    }

    async fn get_project(&self, project_id: u64) -> Result<GitlabProject> {
        debug!(project_id, "fetching project");
        let url = self.api_url(&format!("/projects/{project_id}"));

        let project: GitlabProject = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        Ok(project)
    }

    async fn search_projects(&self, name: &str) -> Result<Vec<GitlabProject>> {
        debug!(name, "searching projects");
        let url = self.api_url("/projects");

        let projects: Vec<GitlabProject> = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("search", name)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(name, count = projects.len(), "searched projects");
        Ok(projects)
    }

    async fn create_merge_request(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
        title: &str,
    ) -> Result<MergeRequestRef> {
        debug!(project_id, source_branch, target_branch, "creating MR");
        let url = self.api_url(&format!("/projects/{project_id}/merge_requests"));

        let payload = CreateMrPayload {
            source_branch,
            target_branch,
            title,
        };

        let mr: MrRefPayload = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(project_id, mr_iid = mr.iid, "created MR");
        Ok(mr.into())
    }

    async fn merge_merge_request(&self, project_id: u64, iid: u64) -> Result<MergeRequestRef> {
        debug!(project_id, mr_iid = iid, "merging MR");
        let url = self.api_url(&format!(
            "/projects/{project_id}/merge_requests/{iid}/merge"
        ));

        let mr: MrRefPayload = self
            .client
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(format!("merge failed: {e}")))?
            .json()
            .await?;

        debug!(project_id, mr_iid = iid, "merge complete");
        Ok(mr.into())
    }
}
