//! TAPD API client

use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum tasks fetched per iteration query
const TASK_PAGE_LIMIT: u32 = 200;

/// TAPD REST client
pub struct TapdClient {
    client: Client,
    token: String,
    base_url: String,
}

/// Response envelope wrapping every TAPD payload.
///
/// `status` is 1 on success; anything else is an API-level failure whose
/// explanation lives in `info`.
#[derive(Deserialize)]
struct TapdEnvelope<T> {
    status: i64,
    info: String,
    data: Option<T>,
}

/// A TAPD user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapdUser {
    /// User id
    pub id: String,
    /// English id; either this or `id` identifies the user
    pub nick: String,
    /// Display name
    pub name: String,
    /// Account status label
    #[serde(default)]
    pub status_name: String,
}

/// A task within an iteration
#[derive(Debug, Clone, Deserialize)]
pub struct TapdTask {
    /// Task title
    pub name: String,
    /// Owner nicks, `;`-separated when the task is shared
    #[serde(default)]
    pub owner: String,
    /// Lifecycle status: "open", "progressing" or "done"
    #[serde(default)]
    pub status: String,
    /// Priority label, e.g. "High"
    #[serde(default)]
    pub priority_label: String,
    /// Completion percentage
    #[serde(default)]
    pub progress: u32,
}

/// Tasks arrive wrapped in a single-key object per entry
#[derive(Deserialize)]
struct TaskEntry {
    #[serde(rename = "Task")]
    task: TapdTask,
}

impl TapdClient {
    /// Create a new TAPD client.
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::TapdApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the user the configured token belongs to.
    pub async fn current_user(&self) -> Result<TapdUser> {
        debug!("fetching TAPD user info");
        let url = format!("{}/users/info", self.base_url);

        let user = self.get::<TapdUser>(&url, &[]).await?;
        debug!(nick = %user.nick, "fetched TAPD user info");
        Ok(user)
    }

    /// Fetch the tasks of one iteration, optionally filtered to a
    /// `|`-separated owner list.
    pub async fn iteration_tasks(
        &self,
        workspace_id: &str,
        iteration_id: &str,
        owner: Option<&str>,
    ) -> Result<Vec<TapdTask>> {
        debug!(workspace_id, iteration_id, owner, "fetching iteration tasks");
        let url = format!("{}/tasks", self.base_url);

        let limit = TASK_PAGE_LIMIT.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("workspace_id", workspace_id),
            ("iteration_id", iteration_id),
            ("limit", &limit),
        ];
        if let Some(owner) = owner {
            query.push(("owner", owner));
        }

        let entries = self.get::<Vec<TaskEntry>>(&url, &query).await?;
        let tasks: Vec<TapdTask> = entries.into_iter().map(|entry| entry.task).collect();

        debug!(workspace_id, iteration_id, count = tasks.len(), "fetched iteration tasks");
        Ok(tasks)
    }

    /// Issue an authenticated GET and unwrap the TAPD envelope.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let envelope: TapdEnvelope<T> = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Via", "devbot")
            .query(query)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::TapdApi(e.to_string()))?
            .json()
            .await?;

        if envelope.status != 1 {
            return Err(Error::TapdApi(envelope.info));
        }

        envelope
            .data
            .ok_or_else(|| Error::TapdApi("response envelope carried no data".to_string()))
    }
}
