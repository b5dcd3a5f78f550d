//! Jenkins integration - job listing and build triggering

use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Jenkins REST client
pub struct JenkinsClient {
    client: Client,
    token: String,
    base_url: String,
}

/// A job as returned by the controller's job listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JenkinsJob {
    /// Job name, also the path segment used to trigger builds
    pub name: String,
}

#[derive(Deserialize)]
struct JobListPayload {
    jobs: Vec<JenkinsJob>,
}

impl JenkinsClient {
    /// Create a new Jenkins client for a controller base URL.
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::JenkinsApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The controller base URL, used to build detail links in tool output.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all jobs on the controller.
    pub async fn list_jobs(&self) -> Result<Vec<JenkinsJob>> {
        debug!("listing Jenkins jobs");
        let url = format!("{}/api/json?tree=jobs[name]", self.base_url);

        let payload: JobListPayload = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::JenkinsApi(e.to_string()))?
            .json()
            .await?;

        debug!(count = payload.jobs.len(), "listed Jenkins jobs");
        Ok(payload.jobs)
    }

    /// Trigger a build of the named job.
    pub async fn trigger_build(&self, job_name: &str) -> Result<()> {
        debug!(job_name, "triggering Jenkins build");
        let url = format!("{}/job/{job_name}/build", self.base_url);

        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::JenkinsApi(e.to_string()))?;

        debug!(job_name, "triggered Jenkins build");
        Ok(())
    }
}
