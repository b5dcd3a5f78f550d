//! Mock GitLab gateway for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use devbot::error::{Error, Result};
use devbot::gitlab::GitLabGateway;
use devbot::types::{GitlabProject, MergeRequestRef, MergeRequestSnapshot};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Call record for `create_merge_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMrCall {
    pub project_id: u64,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
}

/// Scripted mock gateway
///
/// Snapshots are served in the order they were scripted; once the script is
/// exhausted the final snapshot repeats, which is what a steady external
/// state looks like to the poller. Calls are recorded for verification and
/// every method supports error injection.
pub struct MockGitLab {
    next_iid: AtomicU64,
    // Scripted responses
    snapshots: Mutex<Vec<MergeRequestSnapshot>>,
    projects_by_id: Mutex<HashMap<u64, GitlabProject>>,
    search_results: Mutex<HashMap<String, Vec<GitlabProject>>>,
    merge_response: Mutex<Option<MergeRequestRef>>,
    // Call tracking
    fetch_calls: Mutex<Vec<(u64, u64)>>,
    get_project_calls: Mutex<Vec<u64>>,
    search_calls: Mutex<Vec<String>>,
    create_calls: Mutex<Vec<CreateMrCall>>,
    merge_calls: Mutex<Vec<(u64, u64)>>,
    // Error injection
    error_on_fetch: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
    error_on_create: Mutex<Option<String>>,
}

impl MockGitLab {
    pub fn new() -> Self {
        Self {
            next_iid: AtomicU64::new(1),
            snapshots: Mutex::new(Vec::new()),
            projects_by_id: Mutex::new(HashMap::new()),
            search_results: Mutex::new(HashMap::new()),
            merge_response: Mutex::new(None),
            fetch_calls: Mutex::new(Vec::new()),
            get_project_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_fetch: Mutex::new(None),
            error_on_merge: Mutex::new(None),
            error_on_create: Mutex::new(None),
        }
    }

    // === Scripting methods ===

    /// Append a snapshot to the fetch script
    pub fn push_snapshot(&self, snapshot: MergeRequestSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }

    /// Register a project for lookup by id
    pub fn set_project(&self, project: GitlabProject) {
        self.projects_by_id
            .lock()
            .unwrap()
            .insert(project.id, project);
    }

    /// Register the result list for a name search
    pub fn set_search_results(&self, name: &str, projects: Vec<GitlabProject>) {
        self.search_results
            .lock()
            .unwrap()
            .insert(name.to_string(), projects);
    }

    /// Set the reference returned by the merge call
    pub fn set_merge_response(&self, mr: MergeRequestRef) {
        *self.merge_response.lock().unwrap() = Some(mr);
    }

    // === Error injection methods ===

    /// Make `fetch_merge_request` return a transport error
    pub fn fail_fetch(&self, msg: &str) {
        *self.error_on_fetch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_merge_request` return a transport error
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_merge_request` return a transport error
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Number of snapshot fetches issued
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.lock().unwrap().len()
    }

    /// All `create_merge_request` calls
    pub fn create_calls(&self) -> Vec<CreateMrCall> {
        self.create_calls.lock().unwrap().clone()
    }

    /// All `merge_merge_request` calls as (`project_id`, iid)
    pub fn merge_calls(&self) -> Vec<(u64, u64)> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// All `search_projects` calls
    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Assert the merge call was never issued
    pub fn assert_merge_not_called(&self) {
        let calls = self.merge_calls();
        assert!(calls.is_empty(), "expected no merge call but got: {calls:?}");
    }

    /// Assert nothing was created
    pub fn assert_create_not_called(&self) {
        let calls = self.create_calls();
        assert!(
            calls.is_empty(),
            "expected no create call but got: {calls:?}"
        );
    }
}

impl Default for MockGitLab {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitLabGateway for MockGitLab {
    async fn fetch_merge_request(
        &self,
        project_id: u64,
        iid: u64,
    ) -> Result<MergeRequestSnapshot> {
        let call_index = {
            let mut calls = self.fetch_calls.lock().unwrap();
            calls.push((project_id, iid));
            calls.len() - 1
        };

        if let Some(msg) = self.error_on_fetch.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let snapshots = self.snapshots.lock().unwrap();
        snapshots
            .get(call_index)
            .or_else(|| snapshots.last())
            .cloned()
            .ok_or_else(|| Error::GitLabApi("no snapshot scripted".to_string()))
    }

    async fn get_project(&self, project_id: u64) -> Result<GitlabProject> {
        self.get_project_calls.lock().unwrap().push(project_id);

        self.projects_by_id
            .lock()
            .unwrap()
            .get(&project_id)
            .cloned()
            .ok_or_else(|| Error::GitLabApi(format!("no project scripted for id {project_id}")))
    }

    async fn search_projects(&self, name: &str) -> Result<Vec<GitlabProject>> {
        self.search_calls.lock().unwrap().push(name.to_string());

        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_merge_request(
        &self,
        project_id: u64,
        source_branch: &str,
        target_branch: &str,
        title: &str,
    ) -> Result<MergeRequestRef> {
        self.create_calls.lock().unwrap().push(CreateMrCall {
            project_id,
            source_branch: source_branch.to_string(),
            target_branch: target_branch.to_string(),
            title: title.to_string(),
        });

        if let Some(msg) = self.error_on_create.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        let iid = self.next_iid.fetch_add(1, Ordering::SeqCst);
        Ok(MergeRequestRef {
            iid,
            web_url: format!(
                "https://gitlab.example.com/project/{project_id}/-/merge_requests/{iid}"
            ),
        })
    }

    async fn merge_merge_request(&self, project_id: u64, iid: u64) -> Result<MergeRequestRef> {
        self.merge_calls.lock().unwrap().push((project_id, iid));

        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::GitLabApi(msg.clone()));
        }

        Ok(self
            .merge_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| MergeRequestRef {
                iid,
                web_url: format!(
                    "https://gitlab.example.com/project/{project_id}/-/merge_requests/{iid}"
                ),
            }))
    }
}
