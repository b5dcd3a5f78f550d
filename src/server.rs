//! MCP server - tool registration and dispatch
//!
//! Exposes the TAPD, Jenkins and GitLab bindings as tools over the
//! tool-calling protocol. Handlers translate domain errors into failure
//! results carrying the original message text; all real work lives in the
//! clients and the merge orchestrator.

use crate::config::AppConfig;
use crate::error::Error;
use crate::jenkins::JenkinsClient;
use crate::merge::{CreateMergeRequest, MergeOrchestrator};
use crate::tapd::{group_tasks_by_owner, TapdClient};
use crate::types::MergeOutcome;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

const INSTRUCTIONS: &str = "devbot bridges chat agents to a team's DevOps stack. \
GitLab tools create and merge merge requests (merging waits for the request to \
become mergeable first). Jenkins tools list jobs and trigger builds. TAPD tools \
report on users and iteration tasks.";

/// devbot MCP server
#[derive(Clone)]
pub struct DevbotServer {
    orchestrator: Arc<MergeOrchestrator>,
    jenkins: Arc<JenkinsClient>,
    tapd: Arc<TapdClient>,
    config: Arc<AppConfig>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool parameter types
// ============================================================================

/// Parameters for `gitlab_create_merge_request`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateMergeRequestParams {
    /// Numeric id of the GitLab project
    pub project_id: Option<u64>,
    /// Project name, used for fuzzy lookup when no id is given
    pub project_name: Option<String>,
    /// Source branch name
    pub source_branch: Option<String>,
    /// Target branch name; defaults to the project's default branch
    pub target_branch: Option<String>,
}

/// Parameters for `gitlab_merge_merge_request`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeMergeRequestParams {
    /// Numeric id of the GitLab project
    pub project_id: u64,
    /// Internal id (iid) of the merge request within the project
    pub merge_request_iid: u64,
}

/// Parameters for `jenkins_job_build`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct JobBuildParams {
    /// Jenkins job name; when omitted the job list is returned instead
    pub job_name: Option<String>,
}

/// Parameters for `tapd_iteration_user_tasks`
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IterationTasksParams {
    /// TAPD workspace (project) id; falls back to `TAPD_DEFAULT_WORKSPACE_ID`
    pub workspace_id: Option<String>,
    /// Iteration id
    pub iteration_id: String,
    /// Owner nicks, `|`-separated; falls back to the configured group nicks,
    /// then the configured user nick
    pub owner: Option<String>,
}

impl DevbotServer {
    /// Build a server over already-constructed collaborators.
    pub fn new(
        config: Arc<AppConfig>,
        orchestrator: Arc<MergeOrchestrator>,
        jenkins: Arc<JenkinsClient>,
        tapd: Arc<TapdClient>,
    ) -> Self {
        Self {
            orchestrator,
            jenkins,
            tapd,
            config,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl DevbotServer {
    #[tool(
        name = "gitlab_create_merge_request",
        description = "Create a GitLab merge request. The project is given by id or looked up by name; an ambiguous name returns the candidate list instead of creating anything. The target branch defaults to the project's default branch."
    )]
    async fn gitlab_create_merge_request(
        &self,
        params: Parameters<CreateMergeRequestParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = CreateMergeRequest {
            project_id: params.0.project_id,
            project_name: params.0.project_name,
            source_branch: params.0.source_branch,
            target_branch: params.0.target_branch,
        };

        match self.orchestrator.create(request).await {
            Ok(outcome) => Ok(outcome_result(&outcome)),
            Err(error) => Ok(failure_result(&error)),
        }
    }

    #[tool(
        name = "gitlab_merge_merge_request",
        description = "Merge an existing GitLab merge request. Waits up to two minutes for the request to become mergeable (CI running, status being computed), then merges. Fails without merging if the request is closed, draft, conflicted, unapproved or otherwise blocked."
    )]
    async fn gitlab_merge_merge_request(
        &self,
        params: Parameters<MergeMergeRequestParams>,
    ) -> Result<CallToolResult, McpError> {
        match self
            .orchestrator
            .merge_existing(params.0.project_id, params.0.merge_request_iid)
            .await
        {
            Ok(outcome) => Ok(outcome_result(&outcome)),
            Err(error) => Ok(failure_result(&error)),
        }
    }

    #[tool(name = "jenkins_job_list", description = "List Jenkins jobs")]
    async fn jenkins_job_list(&self) -> Result<CallToolResult, McpError> {
        match self.jenkins.list_jobs().await {
            Ok(jobs) => {
                let json = serde_json::to_string_pretty(&jobs)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(error) => Ok(failure_result(&error)),
        }
    }

    #[tool(
        name = "jenkins_job_build",
        description = "Trigger a build of a Jenkins job. When no job name is given, returns the job list instead."
    )]
    async fn jenkins_job_build(
        &self,
        params: Parameters<JobBuildParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(job_name) = params.0.job_name.filter(|name| !name.is_empty()) else {
            return self.jenkins_job_list().await;
        };

        match self.jenkins.trigger_build(&job_name).await {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "✅ Jenkins job \"{job_name}\" build triggered.\nDetails: {}/job/{job_name}",
                self.jenkins.base_url()
            ))])),
            Err(error) => Ok(failure_result(&error)),
        }
    }

    #[tool(
        name = "tapd_users_info",
        description = "Get the TAPD user the configured token belongs to"
    )]
    async fn tapd_users_info(&self) -> Result<CallToolResult, McpError> {
        match self.tapd.current_user().await {
            Ok(user) => {
                let json = serde_json::to_string_pretty(&user)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(json)]))
            }
            Err(error) => Ok(failure_result(&error)),
        }
    }

    #[tool(
        name = "tapd_iteration_user_tasks",
        description = "Summarize the tasks of a TAPD iteration per owner: counts of completed, in-progress and not-started tasks plus the task list. Useful for weekly progress reports."
    )]
    async fn tapd_iteration_user_tasks(
        &self,
        params: Parameters<IterationTasksParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(workspace_id) = params
            .0
            .workspace_id
            .filter(|id| !id.is_empty())
            .or_else(|| self.config.tapd_default_workspace_id.clone())
        else {
            return Ok(failure_result(&Error::InvalidRequest(
                "workspace id not given and TAPD_DEFAULT_WORKSPACE_ID is not set".to_string(),
            )));
        };

        let owner = params
            .0
            .owner
            .filter(|owner| !owner.is_empty())
            .or_else(|| {
                if self.config.tapd_group_nicks.is_empty() {
                    self.config.tapd_nick.clone()
                } else {
                    Some(self.config.tapd_group_nicks.join("|"))
                }
            });

        match self
            .tapd
            .iteration_tasks(&workspace_id, &params.0.iteration_id, owner.as_deref())
            .await
        {
            Ok(tasks) => {
                let report = group_tasks_by_owner(&tasks);
                Ok(CallToolResult::success(vec![Content::text(
                    report.render(),
                )]))
            }
            Err(error) => Ok(failure_result(&error)),
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DevbotServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "devbot".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("devbot MCP server".to_string()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

// ============================================================================
// Result formatting
// ============================================================================

/// Render an orchestration outcome as tool output.
fn outcome_result(outcome: &MergeOutcome) -> CallToolResult {
    let text = match outcome {
        MergeOutcome::Created { iid, web_url } => {
            format!("✅ Merge request created.\nURL: {web_url}\nIID: {iid}")
        }
        MergeOutcome::Merged { web_url } => {
            format!("✅ Merge request merged.\nURL: {web_url}")
        }
        MergeOutcome::Disambiguation { candidates } => {
            let mut text = String::from("Multiple projects match, pick one:\n");
            for project in candidates {
                let _ = writeln!(
                    text,
                    "{}: {} ({})",
                    project.id, project.name_with_namespace, project.web_url
                );
            }
            text
        }
    };
    CallToolResult::success(vec![Content::text(text)])
}

/// Convert a domain error into a failure result, keeping the original
/// message text and prefixing the machine code when one exists.
fn failure_result(error: &Error) -> CallToolResult {
    let text = match error.code() {
        Some(code) => format!("{code}: {error}"),
        None => error.to_string(),
    };
    CallToolResult::error(vec![Content::text(text)])
}
