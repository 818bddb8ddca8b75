//! Recording tracker gateway
//!
//! [`RecordingTracker`] answers every [`TrackerGateway`] call from canned
//! data and records `op:argument` strings so tests can assert which queries
//! a flow issued.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use jirabot_jira::{JiraProject, JiraSearchResults, JiraUser, TrackerError, TrackerGateway};

use crate::fixtures;

#[derive(Default)]
pub struct RecordingTracker {
  calls: Mutex<Vec<String>>,
  failing: HashSet<&'static str>,
  results: HashMap<&'static str, JiraSearchResults>,
  projects: Vec<JiraProject>,
}

impl RecordingTracker {
  /// A tracker where every call succeeds with two issues per search.
  pub fn new() -> Self {
    Self {
      projects: vec![fixtures::project("R2", "Rocket Two"), fixtures::project("OPS", "Operations")],
      ..Self::default()
    }
  }

  /// Make `op` (e.g. `"get_sprint_info"`) fail with a 500.
  pub fn failing(mut self, op: &'static str) -> Self {
    self.failing.insert(op);
    self
  }

  /// Make every search-backed call fail, leaving project lookups working.
  pub fn failing_all_searches(self) -> Self {
    [
      "search_issues",
      "get_recent_updates",
      "get_sprint_info",
      "get_blocked_issues",
      "get_high_priority_issues",
      "get_team_workload",
      "search_recent_across_projects",
    ]
    .into_iter()
    .fold(self, |tracker, op| tracker.failing(op))
  }

  /// Answer `op` with `results` instead of the default fixture.
  pub fn with_results(mut self, op: &'static str, results: JiraSearchResults) -> Self {
    self.results.insert(op, results);
    self
  }

  pub fn with_projects(mut self, projects: Vec<JiraProject>) -> Self {
    self.projects = projects;
    self
  }

  /// Every call so far, formatted as `op:argument`.
  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().expect("calls lock poisoned").clone()
  }

  /// Whether any call to `op` was made.
  pub fn called(&self, op: &str) -> bool {
    self
      .calls()
      .iter()
      .any(|call| call.split(':').next() == Some(op))
  }

  fn record(&self, op: &'static str, arg: impl std::fmt::Display) -> Result<(), TrackerError> {
    self
      .calls
      .lock()
      .expect("calls lock poisoned")
      .push(format!("{op}:{arg}"));

    if self.failing.contains(op) {
      return Err(TrackerError::Api {
        status: 500,
        message: format!("{op} failed"),
      });
    }
    Ok(())
  }

  fn search(&self, op: &'static str, arg: impl std::fmt::Display) -> Result<JiraSearchResults, TrackerError> {
    self.record(op, arg)?;
    Ok(
      self
        .results
        .get(op)
        .cloned()
        .unwrap_or_else(|| fixtures::search_results("DEMO", 2)),
    )
  }
}

#[async_trait]
impl TrackerGateway for RecordingTracker {
  async fn search_issues(&self, jql: &str, _max_results: Option<u32>) -> Result<JiraSearchResults, TrackerError> {
    self.search("search_issues", jql)
  }

  async fn get_project_info(&self, project_key: &str) -> Result<JiraProject, TrackerError> {
    self.record("get_project_info", project_key)?;
    self
      .projects
      .iter()
      .find(|p| p.key == project_key)
      .cloned()
      .ok_or_else(|| TrackerError::NotFound {
        message: format!("Project not found: {project_key}"),
      })
  }

  async fn list_projects(&self) -> Result<Vec<JiraProject>, TrackerError> {
    self.record("list_projects", "")?;
    Ok(self.projects.clone())
  }

  async fn current_user(&self) -> Result<JiraUser, TrackerError> {
    self.record("current_user", "")?;
    Ok(JiraUser {
      display_name: Some("Jira Bot".to_string()),
      email_address: Some("bot@example.com".to_string()),
      ..JiraUser::default()
    })
  }

  async fn get_recent_updates(&self, project_key: &str, limit: u32) -> Result<JiraSearchResults, TrackerError> {
    self.search("get_recent_updates", format!("{project_key}/{limit}"))
  }

  async fn get_sprint_info(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    self.search("get_sprint_info", project_key)
  }

  async fn get_blocked_issues(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    self.search("get_blocked_issues", project_key)
  }

  async fn get_high_priority_issues(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    self.search("get_high_priority_issues", project_key)
  }

  async fn get_team_workload(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    self.search("get_team_workload", project_key)
  }

  async fn search_recent_across_projects(&self, days: u32) -> Result<JiraSearchResults, TrackerError> {
    self.search("search_recent_across_projects", days)
  }
}
