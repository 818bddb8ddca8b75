//! # Data Filter
//!
//! Reduces a [`QueryResultBundle`] to the bounded projection sent to the
//! language model. Each list slot keeps at most [`MAX_ISSUES_PER_SLOT`]
//! issues in their original order and only the fields relevant to that slot.
//! The workload slot is grouped by assignee instead of truncated.

use indexmap::IndexMap;
use jirabot_jira::{JiraIssue, JiraProject, JiraSearchResults};
use serde::Serialize;
use serde_json::Value;

use crate::bundle::QueryResultBundle;

/// Maximum issues kept per list slot.
pub const MAX_ISSUES_PER_SLOT: usize = 20;

/// Group name for issues without an assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Filtered view of a bundle. Absent slots are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredBundle {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project_info: Option<JiraProject>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recent_updates: Option<IssueList<RecentIssue>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sprint_info: Option<IssueList<SprintIssue>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub blocked_issues: Option<IssueList<BlockedIssue>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub high_priority_issues: Option<IssueList<HighPriorityIssue>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub team_workload: Option<Workload>,
}

/// Total from the tracker plus the kept issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueList<T> {
  pub total: u64,
  pub issues: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentIssue {
  pub key: String,
  pub summary: String,
  pub status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub issuetype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintIssue {
  pub key: String,
  pub summary: String,
  pub status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub story_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockedIssue {
  pub key: String,
  pub summary: String,
  pub status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub flagged: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighPriorityIssue {
  pub key: String,
  pub summary: String,
  pub status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadIssue {
  pub key: String,
  pub summary: String,
  pub status: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub issuetype: Option<String>,
}

/// Active issues grouped by assignee display name, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workload {
  pub total: u64,
  pub assignees: IndexMap<String, Vec<WorkloadIssue>>,
}

/// Produce the filtered view of `bundle`.
pub fn filter(bundle: &QueryResultBundle) -> FilteredBundle {
  FilteredBundle {
    project_info: bundle.project_info.clone(),
    recent_updates: bundle.recent_updates.as_ref().map(|r| truncate(r, recent_issue)),
    sprint_info: bundle.sprint_info.as_ref().map(|r| truncate(r, sprint_issue)),
    blocked_issues: bundle.blocked_issues.as_ref().map(|r| truncate(r, blocked_issue)),
    high_priority_issues: bundle.high_priority_issues.as_ref().map(|r| truncate(r, high_priority_issue)),
    team_workload: bundle.team_workload.as_ref().map(group_by_assignee),
  }
}

fn truncate<T>(results: &JiraSearchResults, project: fn(&JiraIssue) -> T) -> IssueList<T> {
  IssueList {
    total: results.total,
    issues: results.issues.iter().take(MAX_ISSUES_PER_SLOT).map(project).collect(),
  }
}

fn group_by_assignee(results: &JiraSearchResults) -> Workload {
  let mut assignees: IndexMap<String, Vec<WorkloadIssue>> = IndexMap::new();
  for issue in &results.issues {
    let name = issue.fields.assignee_name().unwrap_or(UNASSIGNED);
    assignees.entry(name.to_string()).or_default().push(WorkloadIssue {
      key: issue.key.clone(),
      summary: issue.fields.summary.clone(),
      status: issue.fields.status_name().to_string(),
      issuetype: owned(issue.fields.issuetype_name()),
    });
  }

  Workload {
    total: results.total,
    assignees,
  }
}

fn owned(value: Option<&str>) -> Option<String> {
  value.map(str::to_string)
}

fn recent_issue(issue: &JiraIssue) -> RecentIssue {
  RecentIssue {
    key: issue.key.clone(),
    summary: issue.fields.summary.clone(),
    status: issue.fields.status_name().to_string(),
    priority: owned(issue.fields.priority_name()),
    updated: issue.fields.updated.clone(),
    issuetype: owned(issue.fields.issuetype_name()),
  }
}

fn sprint_issue(issue: &JiraIssue) -> SprintIssue {
  SprintIssue {
    key: issue.key.clone(),
    summary: issue.fields.summary.clone(),
    status: issue.fields.status_name().to_string(),
    assignee: owned(issue.fields.assignee_name()),
    story_points: issue.fields.story_points,
  }
}

fn blocked_issue(issue: &JiraIssue) -> BlockedIssue {
  BlockedIssue {
    key: issue.key.clone(),
    summary: issue.fields.summary.clone(),
    status: issue.fields.status_name().to_string(),
    assignee: owned(issue.fields.assignee_name()),
    flagged: issue.fields.flagged.clone(),
  }
}

fn high_priority_issue(issue: &JiraIssue) -> HighPriorityIssue {
  HighPriorityIssue {
    key: issue.key.clone(),
    summary: issue.fields.summary.clone(),
    status: issue.fields.status_name().to_string(),
    priority: owned(issue.fields.priority_name()),
    due_date: issue.fields.duedate.clone(),
  }
}

#[cfg(test)]
mod tests {
  use jirabot_test_utils::fixtures::{issue, project, results_of, search_results};
  use serde_json::json;

  use super::*;

  #[test]
  fn test_empty_bundle_serializes_to_empty_object() {
    let filtered = filter(&QueryResultBundle::default());
    assert_eq!(filtered, FilteredBundle::default());
    assert_eq!(serde_json::to_value(&filtered).unwrap(), json!({}));
  }

  #[test]
  fn test_list_slots_keep_first_twenty_in_order() {
    let bundle = QueryResultBundle {
      recent_updates: Some(search_results("R2", 25)),
      blocked_issues: Some(search_results("R2", 3)),
      ..Default::default()
    };

    let filtered = filter(&bundle);
    let recent = filtered.recent_updates.unwrap();
    assert_eq!(recent.total, 25);
    assert_eq!(recent.issues.len(), MAX_ISSUES_PER_SLOT);
    let keys: Vec<_> = recent.issues.iter().map(|i| i.key.as_str()).collect();
    let expected: Vec<String> = (1..=20).map(|n| format!("R2-{n}")).collect();
    assert_eq!(keys, expected);

    assert_eq!(filtered.blocked_issues.unwrap().issues.len(), 3);
  }

  #[test]
  fn test_every_list_slot_is_capped() {
    let bundle = QueryResultBundle {
      sprint_info: Some(search_results("SP", 21)),
      blocked_issues: Some(search_results("BL", 30)),
      high_priority_issues: Some(search_results("HP", 45)),
      ..Default::default()
    };

    let filtered = filter(&bundle);

    let sprint = filtered.sprint_info.unwrap();
    assert_eq!(sprint.total, 21);
    assert_eq!(sprint.issues.len(), MAX_ISSUES_PER_SLOT);
    assert_eq!(sprint.issues.last().unwrap().key, "SP-20");

    let blocked = filtered.blocked_issues.unwrap();
    assert_eq!(blocked.total, 30);
    assert_eq!(blocked.issues.len(), MAX_ISSUES_PER_SLOT);
    assert_eq!(blocked.issues[0].key, "BL-1");

    let high = filtered.high_priority_issues.unwrap();
    assert_eq!(high.total, 45);
    assert_eq!(high.issues.len(), MAX_ISSUES_PER_SLOT);
    assert_eq!(high.issues.last().unwrap().key, "HP-20");
  }

  #[test]
  fn test_absent_slots_are_omitted() {
    let bundle = QueryResultBundle {
      project_info: Some(project("R2", "Rocket Two")),
      sprint_info: Some(search_results("R2", 1)),
      ..Default::default()
    };

    let value = serde_json::to_value(filter(&bundle)).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["projectInfo".to_string(), "sprintInfo".to_string()]);
  }

  #[test]
  fn test_slot_projections() {
    let mut sprint = issue("R2-1", "Build rocket", "In Progress", Some("Ada"));
    sprint.fields.story_points = Some(5.0);

    let bundle = QueryResultBundle {
      recent_updates: Some(results_of(vec![issue("R2-2", "Fuel", "Done", None)])),
      sprint_info: Some(results_of(vec![sprint])),
      high_priority_issues: Some(results_of(vec![issue("R2-3", "Launch", "To Do", None)])),
      ..Default::default()
    };

    let value = serde_json::to_value(filter(&bundle)).unwrap();
    assert_eq!(
      value["recentUpdates"]["issues"][0],
      json!({
          "key": "R2-2",
          "summary": "Fuel",
          "status": "Done",
          "priority": "High",
          "updated": "2024-05-01T10:00:00.000+0000",
          "issuetype": "Story"
      })
    );
    assert_eq!(
      value["sprintInfo"]["issues"][0],
      json!({
          "key": "R2-1",
          "summary": "Build rocket",
          "status": "In Progress",
          "assignee": "Ada",
          "storyPoints": 5.0
      })
    );
    assert_eq!(
      value["highPriorityIssues"]["issues"][0],
      json!({
          "key": "R2-3",
          "summary": "Launch",
          "status": "To Do",
          "priority": "High",
          "dueDate": "2024-05-10"
      })
    );
  }

  #[test]
  fn test_blocked_passes_flag_through() {
    let mut flagged = issue("R2-9", "Stuck", "Blocked", Some("Ada"));
    flagged.fields.flagged = Some(json!([{ "value": "Impediment" }]));

    let bundle = QueryResultBundle {
      blocked_issues: Some(results_of(vec![flagged, issue("R2-10", "Waiting", "Blocked", None)])),
      ..Default::default()
    };

    let value = serde_json::to_value(filter(&bundle)).unwrap();
    assert_eq!(value["blockedIssues"]["issues"][0]["flagged"], json!([{ "value": "Impediment" }]));
    assert!(value["blockedIssues"]["issues"][1].get("flagged").is_none());
    assert!(value["blockedIssues"]["issues"][1].get("assignee").is_none());
  }

  #[test]
  fn test_workload_groups_by_assignee() {
    let issues = vec![
      issue("R2-1", "a", "In Progress", Some("Ada")),
      issue("R2-2", "b", "To Do", None),
      issue("R2-3", "c", "In Progress", Some("Grace")),
      issue("R2-4", "d", "To Do", Some("Ada")),
    ];
    let count = issues.len();
    let bundle = QueryResultBundle {
      team_workload: Some(results_of(issues)),
      ..Default::default()
    };

    let workload = filter(&bundle).team_workload.unwrap();
    assert_eq!(workload.total, 4);

    let names: Vec<_> = workload.assignees.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Ada", UNASSIGNED, "Grace"]);

    let ada: Vec<_> = workload.assignees["Ada"].iter().map(|i| i.key.as_str()).collect();
    assert_eq!(ada, vec!["R2-1", "R2-4"]);

    let grouped: usize = workload.assignees.values().map(Vec::len).sum();
    assert_eq!(grouped, count);
  }

  #[test]
  fn test_workload_is_not_truncated() {
    let bundle = QueryResultBundle {
      team_workload: Some(search_results("R2", 30)),
      ..Default::default()
    };

    let workload = filter(&bundle).team_workload.unwrap();
    assert_eq!(workload.assignees[UNASSIGNED].len(), 30);
  }
}
