//! Core types for devbot

use serde::Deserialize;
use std::time::Duration;

/// Poll interval between mergeability checks (2 seconds)
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Deadline for a merge request to become mergeable (2 minutes)
const DEFAULT_MAX_WAIT_MS: u64 = 120_000;

/// Polling policy for the mergeability resolver.
///
/// Fixed interval, no backoff: the deadline is short and call volume is low,
/// so a plain sleep loop is all the scheduling this needs.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Sleep between polls after a transient (Wait) classification
    pub interval: Duration,
    /// Wall-clock budget for one resolution, checked at the top of each poll
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_wait: Duration::from_millis(DEFAULT_MAX_WAIT_MS),
        }
    }
}

/// Point-in-time view of a merge request's mergeability inputs
///
/// Fetched fresh on every poll; nothing here is cached across polls. Field
/// names follow the upstream REST representation so the snapshot can be
/// deserialized straight off the wire. Different GitLab deployments populate
/// different subsets of the optional fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeRequestSnapshot {
    /// Internal id of the merge request within its project
    #[serde(default)]
    pub iid: u64,
    /// Merge request title
    #[serde(default)]
    pub title: String,
    /// Lifecycle state: "opened", "closed", "merged" or "locked"
    pub state: String,
    /// Modern draft flag
    #[serde(default)]
    pub draft: bool,
    /// Legacy draft flag, predates `draft`
    #[serde(default)]
    pub work_in_progress: bool,
    /// Fine-grained mergeability code (GitLab 15.6+); kept as the raw string
    /// because values unknown to us must still flow through classification
    pub detailed_merge_status: Option<String>,
    /// Coarse legacy mergeability code
    pub merge_status: Option<String>,
    /// Head pipeline, when one exists
    pub pipeline: Option<PipelineSnapshot>,
    /// Whether all blocking discussions are resolved; absent means satisfied
    pub blocking_discussions_resolved: Option<bool>,
    /// Approval state, when the deployment exposes it on the MR payload
    pub approvals: Option<ApprovalSnapshot>,
    /// Web URL of the merge request
    #[serde(default)]
    pub web_url: String,
}

impl MergeRequestSnapshot {
    /// Whether either draft flag is set.
    pub const fn is_draft(&self) -> bool {
        self.draft || self.work_in_progress
    }
}

/// Pipeline status as embedded in a merge request payload
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSnapshot {
    /// Pipeline status string: pending/running/failed/canceled/skipped/success
    pub status: String,
}

/// Approval state as embedded in a merge request payload
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalSnapshot {
    /// Whether the approval rules are satisfied
    pub approved: bool,
    /// Approvals still missing
    #[serde(default)]
    pub approvals_left: u32,
}

/// A GitLab project as returned by project lookup and search
#[derive(Debug, Clone, Deserialize)]
pub struct GitlabProject {
    /// Numeric project id
    pub id: u64,
    /// Short project name
    pub name: String,
    /// Namespace-qualified name, e.g. "platform / billing"
    pub name_with_namespace: String,
    /// Web URL of the project
    pub web_url: String,
    /// Default branch, absent on empty repositories
    pub default_branch: Option<String>,
}

/// Minimal reference to a merge request returned by mutating calls
#[derive(Debug, Clone)]
pub struct MergeRequestRef {
    /// Internal id within the project
    pub iid: u64,
    /// Web URL of the merge request
    pub web_url: String,
}

/// Outcome of one merge orchestration request
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// A new merge request was created
    Created {
        /// Internal id of the new merge request
        iid: u64,
        /// Web URL of the new merge request
        web_url: String,
    },
    /// An existing merge request was merged
    Merged {
        /// Web URL of the merged merge request
        web_url: String,
    },
    /// A name-based project lookup was ambiguous; the decision goes back to
    /// the caller and nothing was created or merged
    Disambiguation {
        /// All projects matching the requested name
        candidates: Vec<GitlabProject>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_has_expected_values() {
        let policy = PollPolicy::default();

        assert_eq!(policy.interval, Duration::from_secs(2));
        assert_eq!(policy.max_wait, Duration::from_secs(120));
    }

    #[test]
    fn either_draft_flag_marks_snapshot_draft() {
        let legacy = MergeRequestSnapshot {
            state: "opened".to_string(),
            work_in_progress: true,
            ..Default::default()
        };
        let modern = MergeRequestSnapshot {
            state: "opened".to_string(),
            draft: true,
            ..Default::default()
        };

        assert!(legacy.is_draft());
        assert!(modern.is_draft());
        assert!(!MergeRequestSnapshot::default().is_draft());
    }
}
