//! Mergeability resolution - time-bounded polling driver
//!
//! Repeatedly fetches a fresh snapshot through the gateway, classifies it,
//! and either returns (Ready), sleeps and retries (Wait), or fails
//! immediately (Blocked). The deadline check happens only at the top of the
//! loop; a poll already underway when the deadline lands runs to completion.

use crate::error::{Error, Result};
use crate::gitlab::GitLabGateway;
use crate::merge::classify::{classify, Decision};
use crate::types::PollPolicy;
use tokio::time::Instant;
use tracing::debug;

/// Wait until a merge request becomes mergeable, or fail.
///
/// Terminates in exactly one of three ways:
/// - `Ok(())` once a snapshot classifies as Ready;
/// - [`Error::MergeBlocked`] the moment a snapshot classifies as Blocked,
///   with no further fetches and no sleep;
/// - [`Error::MergeTimeout`] when the deadline elapses while only transient
///   conditions were observed.
///
/// Transport errors from the gateway propagate as-is; retrying those blindly
/// would mask misconfiguration.
pub async fn wait_for_mergeability(
    gateway: &dyn GitLabGateway,
    project_id: u64,
    iid: u64,
    policy: &PollPolicy,
) -> Result<()> {
    let start = Instant::now();

    while start.elapsed() < policy.max_wait {
        let snapshot = gateway.fetch_merge_request(project_id, iid).await?;

        match classify(&snapshot) {
            Decision::Ready => {
                debug!(project_id, mr_iid = iid, "merge request is mergeable");
                return Ok(());
            }
            Decision::Wait { code, message } => {
                debug!(project_id, mr_iid = iid, %code, message = %message, "waiting");
                tokio::time::sleep(policy.interval).await;
            }
            Decision::Blocked { code, message } => {
                debug!(project_id, mr_iid = iid, %code, message = %message, "blocked");
                return Err(Error::MergeBlocked { code, message });
            }
        }
    }

    Err(Error::MergeTimeout {
        elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}
