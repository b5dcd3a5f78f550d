//! Shared test fixtures

#![allow(dead_code)]

mod mock_gitlab;

pub use mock_gitlab::{CreateMrCall, MockGitLab};

use devbot::types::{ApprovalSnapshot, GitlabProject, MergeRequestSnapshot, PipelineSnapshot};

/// An open, non-draft snapshot with every optional field absent.
///
/// On its own this classifies as Ready; tests set the fields they care about.
pub fn opened_snapshot() -> MergeRequestSnapshot {
    MergeRequestSnapshot {
        iid: 7,
        title: "Add billing export".to_string(),
        state: "opened".to_string(),
        web_url: "https://gitlab.example.com/platform/billing/-/merge_requests/7".to_string(),
        ..Default::default()
    }
}

/// Snapshot with a detailed merge status set
pub fn snapshot_with_detailed(status: &str) -> MergeRequestSnapshot {
    let mut mr = opened_snapshot();
    mr.detailed_merge_status = Some(status.to_string());
    mr
}

/// Snapshot with a head pipeline in the given state
pub fn snapshot_with_pipeline(status: &str) -> MergeRequestSnapshot {
    let mut mr = opened_snapshot();
    mr.pipeline = Some(PipelineSnapshot {
        status: status.to_string(),
    });
    mr
}

/// Snapshot with an approval summary
pub fn snapshot_with_approvals(approved: bool, approvals_left: u32) -> MergeRequestSnapshot {
    let mut mr = opened_snapshot();
    mr.approvals = Some(ApprovalSnapshot {
        approved,
        approvals_left,
    });
    mr
}

/// A project fixture
pub fn project(id: u64, name: &str, default_branch: Option<&str>) -> GitlabProject {
    GitlabProject {
        id,
        name: name.to_string(),
        name_with_namespace: format!("platform / {name}"),
        web_url: format!("https://gitlab.example.com/platform/{name}"),
        default_branch: default_branch.map(String::from),
    }
}
