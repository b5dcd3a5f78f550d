//! Status classification - pure mergeability decisions
//!
//! This module contains the pure, testable heart of the merge flow: one
//! snapshot in, one decision out. No I/O happens here - the polling driver
//! in `resolve` owns all timing and fetching.

use crate::types::MergeRequestSnapshot;

/// Machine-readable reason tag attached to Wait and Blocked decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    /// The merge request is closed, merged or locked
    NotOpen,
    /// The merge request is marked draft/WIP
    DraftStatus,
    /// A pipeline or mergeability check is still running
    CiRunning,
    /// The legacy merge status has not been computed yet
    Checking,
    /// Blocked by branch protection rules
    BlockedStatus,
    /// The source branch cannot be merged cleanly
    MergeConflicts,
    /// The pipeline finished without succeeding
    CiFailed,
    /// Blocking discussions remain unresolved
    UnresolvedDiscussions,
    /// Required approvals are missing
    NotApproved,
    /// A security policy denies the merge
    PoliciesDenied,
}

impl ReasonCode {
    /// The SCREAMING_SNAKE tag used in structured failure responses.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotOpen => "NOT_OPEN",
            Self::DraftStatus => "DRAFT_STATUS",
            Self::CiRunning => "CI_RUNNING",
            Self::Checking => "CHECKING",
            Self::BlockedStatus => "BLOCKED_STATUS",
            Self::MergeConflicts => "MERGE_CONFLICTS",
            Self::CiFailed => "CI_FAILED",
            Self::UnresolvedDiscussions => "UNRESOLVED_DISCUSSIONS",
            Self::NotApproved => "NOT_APPROVED",
            Self::PoliciesDenied => "POLICIES_DENIED",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The merge call can be issued now
    Ready,
    /// A transient condition; poll again after the interval
    Wait {
        /// Machine-readable reason tag
        code: ReasonCode,
        /// Human-readable reason
        message: String,
    },
    /// A terminal condition; abort without retrying
    Blocked {
        /// Machine-readable reason tag
        code: ReasonCode,
        /// Human-readable reason
        message: String,
    },
}

impl Decision {
    fn wait(code: ReasonCode, message: impl Into<String>) -> Self {
        Self::Wait { code, message: message.into() }
    }

    fn blocked(code: ReasonCode, message: impl Into<String>) -> Self {
        Self::Blocked { code, message: message.into() }
    }
}

/// Decide whether a merge request can be merged right now.
///
/// Pure and deterministic: the decision depends on nothing but the snapshot.
/// The rules run in a fixed order and the first match wins. State and draft
/// gates come first because they hold on every GitLab version; after that the
/// detailed status takes priority over the legacy fields when present, but an
/// absent or unrecognized value degrades to the next check rather than
/// failing the whole classification.
pub fn classify(mr: &MergeRequestSnapshot) -> Decision {
    if mr.state != "opened" {
        return Decision::blocked(
            ReasonCode::NotOpen,
            format!("merge request is {}", mr.state),
        );
    }

    if mr.is_draft() {
        return Decision::blocked(
            ReasonCode::DraftStatus,
            "cannot merge a draft merge request",
        );
    }

    // Detailed status first (GitLab 15.6+). Values outside the known set fall
    // through to the legacy checks below instead of being treated as unknown.
    if let Some(detailed) = mr.detailed_merge_status.as_deref() {
        match detailed {
            "mergeable" => return Decision::Ready,
            "ci_still_running" | "checking" => {
                return Decision::wait(
                    ReasonCode::CiRunning,
                    format!("CI/checks in progress: {detailed}"),
                );
            }
            "blocked_status" => {
                return Decision::blocked(
                    ReasonCode::BlockedStatus,
                    "merge request is blocked by branch protection rules",
                );
            }
            "broken_status" => {
                return Decision::blocked(
                    ReasonCode::MergeConflicts,
                    "merge request has merge conflicts",
                );
            }
            "ci_must_pass" => {
                return Decision::blocked(
                    ReasonCode::CiFailed,
                    "CI pipeline must pass before merging",
                );
            }
            "discussions_not_resolved" => {
                return Decision::blocked(
                    ReasonCode::UnresolvedDiscussions,
                    "all discussions must be resolved before merging",
                );
            }
            "not_approved" => {
                return Decision::blocked(
                    ReasonCode::NotApproved,
                    "merge request requires approval",
                );
            }
            "policies_denied" => {
                return Decision::blocked(
                    ReasonCode::PoliciesDenied,
                    "merge blocked by security policies",
                );
            }
            _ => {}
        }
    }

    // Legacy coarse status. can_be_merged does not short-circuit to Ready;
    // the pipeline, discussion and approval checks below still apply.
    match mr.merge_status.as_deref() {
        Some("cannot_be_merged") => {
            return Decision::blocked(
                ReasonCode::MergeConflicts,
                "merge request cannot be merged (likely has conflicts)",
            );
        }
        Some("unchecked") => {
            return Decision::wait(ReasonCode::Checking, "merge status is being checked");
        }
        _ => {}
    }

    if let Some(pipeline) = &mr.pipeline {
        match pipeline.status.as_str() {
            "pending" | "running" => {
                return Decision::wait(
                    ReasonCode::CiRunning,
                    format!("pipeline is {}", pipeline.status),
                );
            }
            "failed" | "canceled" | "skipped" => {
                return Decision::blocked(
                    ReasonCode::CiFailed,
                    format!("pipeline {}", pipeline.status),
                );
            }
            _ => {}
        }
    }

    if mr.blocking_discussions_resolved == Some(false) {
        return Decision::blocked(
            ReasonCode::UnresolvedDiscussions,
            "all discussions must be resolved before merging",
        );
    }

    if let Some(approvals) = &mr.approvals {
        if !approvals.approved && approvals.approvals_left > 0 {
            return Decision::blocked(
                ReasonCode::NotApproved,
                format!(
                    "merge request needs {} more approval(s)",
                    approvals.approvals_left
                ),
            );
        }
    }

    Decision::Ready
}
