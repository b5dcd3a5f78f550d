//! Per-owner task aggregation - pure reporting logic
//!
//! No I/O happens here; the client fetches, this module counts and renders.

use crate::tapd::TapdTask;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Task counts for one owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerStatistics {
    /// Owner nick
    pub owner: String,
    /// All tasks assigned to this owner
    pub total: usize,
    /// Tasks with status "done"
    pub completed: usize,
    /// Tasks with status "progressing"
    pub progressing: usize,
    /// Tasks with status "open"
    pub not_started: usize,
}

/// Aggregated view over one iteration's tasks
#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Per-owner counts, busiest owner first
    pub statistics: Vec<OwnerStatistics>,
    /// Tasks grouped per owner, same order as `statistics`
    grouped: BTreeMap<String, Vec<TapdTask>>,
    /// Total distinct tasks
    pub total_tasks: usize,
}

/// Group tasks by owner and compute per-owner counts.
///
/// A task whose `owner` field names several nicks (`;`-separated) counts
/// once for each distinct nick, so per-owner totals can sum to more than
/// `total_tasks`. Owners are ordered busiest-first, ties alphabetical.
pub fn group_tasks_by_owner(tasks: &[TapdTask]) -> TaskReport {
    let mut grouped: BTreeMap<String, Vec<TapdTask>> = BTreeMap::new();

    for task in tasks {
        let mut owners: Vec<&str> = Vec::new();
        for owner in task.owner.split(';').map(str::trim) {
            if !owner.is_empty() && !owners.contains(&owner) {
                owners.push(owner);
            }
        }

        for owner in owners {
            grouped
                .entry(owner.to_string())
                .or_default()
                .push(task.clone());
        }
    }

    let mut statistics: Vec<OwnerStatistics> = grouped
        .iter()
        .map(|(owner, tasks)| OwnerStatistics {
            owner: owner.clone(),
            total: tasks.len(),
            completed: count_status(tasks, "done"),
            progressing: count_status(tasks, "progressing"),
            not_started: count_status(tasks, "open"),
        })
        .collect();
    statistics.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.owner.cmp(&b.owner)));

    TaskReport {
        statistics,
        grouped,
        total_tasks: tasks.len(),
    }
}

fn count_status(tasks: &[TapdTask], status: &str) -> usize {
    tasks.iter().filter(|task| task.status == status).count()
}

fn status_label(status: &str) -> &str {
    match status {
        "done" => "completed",
        "progressing" => "in progress",
        "open" => "not started",
        other => other,
    }
}

impl TaskReport {
    /// Totals across all owners: (completed, progressing, `not_started`).
    pub fn totals(&self) -> (usize, usize, usize) {
        self.statistics.iter().fold((0, 0, 0), |acc, stat| {
            (
                acc.0 + stat.completed,
                acc.1 + stat.progressing,
                acc.2 + stat.not_started,
            )
        })
    }

    /// Render the report as tool output text.
    pub fn render(&self) -> String {
        let (completed, progressing, not_started) = self.totals();

        let mut out = String::new();
        let _ = writeln!(out, "Task statistics");
        let _ = writeln!(out);
        let _ = writeln!(out, "- Owners: {}", self.statistics.len());
        let _ = writeln!(out, "- Total tasks: {}", self.total_tasks);
        let _ = writeln!(out, "- Completed: {completed}");
        let _ = writeln!(out, "- In progress: {progressing}");
        let _ = writeln!(out, "- Not started: {not_started}");
        let _ = writeln!(out);
        let _ = writeln!(out, "Tasks by owner");

        for stat in &self.statistics {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{}: {} task(s) ({} completed, {} in progress, {} not started)",
                stat.owner, stat.total, stat.completed, stat.progressing, stat.not_started
            );
            if let Some(tasks) = self.grouped.get(&stat.owner) {
                for task in tasks {
                    let _ = writeln!(
                        out,
                        "- [{}] {} [{}] {}%",
                        task.priority_label,
                        task.name,
                        status_label(&task.status),
                        task.progress
                    );
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, owner: &str, status: &str) -> TapdTask {
        TapdTask {
            name: name.to_string(),
            owner: owner.to_string(),
            status: status.to_string(),
            priority_label: "Middle".to_string(),
            progress: 0,
        }
    }

    #[test]
    fn groups_by_owner_and_counts_statuses() {
        let tasks = vec![
            task("a", "alice", "done"),
            task("b", "alice", "progressing"),
            task("c", "bob", "open"),
        ];

        let report = group_tasks_by_owner(&tasks);

        assert_eq!(report.total_tasks, 3);
        assert_eq!(report.statistics.len(), 2);
        // alice has more tasks and sorts first
        assert_eq!(report.statistics[0].owner, "alice");
        assert_eq!(report.statistics[0].completed, 1);
        assert_eq!(report.statistics[0].progressing, 1);
        assert_eq!(report.statistics[1].owner, "bob");
        assert_eq!(report.statistics[1].not_started, 1);
    }

    #[test]
    fn shared_task_counts_for_each_owner() {
        let tasks = vec![task("pairing", "alice; bob", "progressing")];

        let report = group_tasks_by_owner(&tasks);

        assert_eq!(report.total_tasks, 1);
        assert_eq!(report.statistics.len(), 2);
        assert!(report.statistics.iter().all(|s| s.progressing == 1));
    }

    #[test]
    fn repeated_and_blank_owner_entries_are_dropped() {
        let tasks = vec![task("solo", "alice;alice; ;", "done")];

        let report = group_tasks_by_owner(&tasks);

        assert_eq!(report.statistics.len(), 1);
        assert_eq!(report.statistics[0].total, 1);
    }

    #[test]
    fn tie_on_total_breaks_alphabetically() {
        let tasks = vec![task("a", "zoe", "done"), task("b", "amy", "done")];

        let report = group_tasks_by_owner(&tasks);

        assert_eq!(report.statistics[0].owner, "amy");
        assert_eq!(report.statistics[1].owner, "zoe");
    }

    #[test]
    fn render_includes_summary_and_task_lines() {
        let tasks = vec![task("Ship feature", "alice", "progressing")];

        let rendered = group_tasks_by_owner(&tasks).render();

        assert!(rendered.contains("Total tasks: 1"));
        assert!(rendered.contains("alice: 1 task(s)"));
        assert!(rendered.contains("[Middle] Ship feature [in progress] 0%"));
    }
}
