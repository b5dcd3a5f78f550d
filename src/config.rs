//! Process configuration
//!
//! All configuration is read from the environment exactly once, at startup,
//! into an immutable [`AppConfig`] that is shared by reference afterwards.

use crate::error::{Error, Result};

/// Default TAPD API host when `TAPD_BASE_URL` is unset
const DEFAULT_TAPD_BASE_URL: &str = "https://api.tapd.cn";

/// Immutable application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GitLab instance base URL, e.g. `https://gitlab.example.com`
    pub gitlab_base_url: String,
    /// GitLab personal access token (sent as `PRIVATE-TOKEN`)
    pub gitlab_access_token: String,
    /// Jenkins controller base URL
    pub jenkins_base_url: String,
    /// Jenkins API token (sent as a bearer token)
    pub jenkins_access_token: String,
    /// TAPD API base URL
    pub tapd_base_url: String,
    /// TAPD access token (sent as a bearer token)
    pub tapd_access_token: String,
    /// Workspace used when a TAPD tool call omits `workspace_id`
    pub tapd_default_workspace_id: Option<String>,
    /// Nick of the user operating the bot
    pub tapd_nick: Option<String>,
    /// Nicks of the group the bot reports on, `|`-separated in the environment
    pub tapd_group_nicks: Vec<String>,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// The GitLab URL and token are required because the merge orchestration
    /// core cannot run without them; everything else degrades to the tool
    /// failing at call time.
    pub fn from_env() -> Result<Self> {
        let gitlab_base_url = require("GITLAB_BASE_URL")?;
        let gitlab_access_token = require("GITLAB_ACCESS_TOKEN")?;

        Ok(Self {
            gitlab_base_url,
            gitlab_access_token,
            jenkins_base_url: optional("JENKINS_BASE_URL").unwrap_or_default(),
            jenkins_access_token: optional("JENKINS_ACCESS_TOKEN").unwrap_or_default(),
            tapd_base_url: optional("TAPD_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TAPD_BASE_URL.to_string()),
            tapd_access_token: optional("TAPD_ACCESS_TOKEN").unwrap_or_default(),
            tapd_default_workspace_id: optional("TAPD_DEFAULT_WORKSPACE_ID"),
            tapd_nick: optional("TAPD_NICK"),
            tapd_group_nicks: optional("TAPD_GROUP_NICKS")
                .map(|raw| parse_group_nicks(&raw))
                .unwrap_or_default(),
        })
    }
}

/// Split a `|`-separated nick list, dropping blanks.
fn parse_group_nicks(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|nick| !nick.is_empty())
        .map(String::from)
        .collect()
}

fn require(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| Error::Config(format!("{key} environment variable is not set")))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_nicks_split_and_trim() {
        assert_eq!(parse_group_nicks("alice| bob ||carol"), ["alice", "bob", "carol"]);
    }

    #[test]
    fn group_nicks_empty_input() {
        assert!(parse_group_nicks("").is_empty());
        assert!(parse_group_nicks("| |").is_empty());
    }
}
