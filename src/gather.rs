//! # Best-Effort Gather
//!
//! Runs the tracker queries a question needs, one after another, and keeps
//! whatever succeeds. A failing query is logged and recorded as a
//! [`SlotError`]; it never stops the remaining queries.

use jirabot_jira::jql::{DEFAULT_RECENT_LIMIT, GLOBAL_WINDOW_DAYS};
use jirabot_jira::{TrackerError, TrackerGateway};
use tracing::{debug, warn};

use crate::bundle::{QueryResultBundle, Slot};
use crate::router::intent::{QueryPlan, Topics};

/// A tracker query that failed while filling `slot`.
#[derive(Debug)]
pub struct SlotError {
  pub slot: Slot,
  pub error: TrackerError,
}

/// Partial results plus the failures encountered along the way.
#[derive(Debug, Default)]
pub struct Gathered {
  pub bundle: QueryResultBundle,
  pub errors: Vec<SlotError>,
}

impl Gathered {
  fn record<T>(&mut self, slot: Slot, result: Result<T, TrackerError>) -> Option<T> {
    match result {
      Ok(value) => Some(value),
      Err(error) => {
        warn!(slot = %slot, status = ?error.status(), "Tracker query failed: {error}");
        self.errors.push(SlotError { slot, error });
        None
      }
    }
  }
}

/// Execute `plan` against `tracker`.
pub async fn gather(tracker: &dyn TrackerGateway, plan: &QueryPlan) -> Gathered {
  let mut gathered = Gathered::default();

  match plan {
    QueryPlan::Project { key, topics } => gather_project(tracker, key, *topics, &mut gathered).await,
    QueryPlan::Global => {
      let result = tracker.search_recent_across_projects(GLOBAL_WINDOW_DAYS).await;
      if let Some(results) = gathered.record(Slot::RecentUpdates, result) {
        gathered.bundle.recent_updates = Some(results);
      }
    }
  }

  debug!(
    slots = ?gathered.bundle.populated_slots(),
    failures = gathered.errors.len(),
    "Gather finished"
  );
  gathered
}

async fn gather_project(tracker: &dyn TrackerGateway, key: &str, topics: Topics, gathered: &mut Gathered) {
  let project = tracker.get_project_info(key).await;
  gathered.bundle.project_info = gathered.record(Slot::ProjectInfo, project);

  for slot in topics.slots() {
    let result = match slot {
      Slot::SprintInfo => tracker.get_sprint_info(key).await,
      Slot::BlockedIssues => tracker.get_blocked_issues(key).await,
      Slot::HighPriorityIssues => tracker.get_high_priority_issues(key).await,
      Slot::TeamWorkload => tracker.get_team_workload(key).await,
      Slot::ProjectInfo | Slot::RecentUpdates => continue,
    };
    if let Some(results) = gathered.record(slot, result) {
      gathered.bundle.set_issues(slot, results);
    }
  }

  if !topics.any() {
    let result = tracker.get_recent_updates(key, DEFAULT_RECENT_LIMIT).await;
    if let Some(results) = gathered.record(Slot::RecentUpdates, result) {
      gathered.bundle.recent_updates = Some(results);
    }
  }
}
