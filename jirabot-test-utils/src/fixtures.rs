//! Jira JSON fixtures
//!
//! Builders for issue and project payloads shaped like Jira's REST v2
//! responses, so tests can deserialize them through the real models.

use jirabot_jira::{JiraIssue, JiraProject, JiraSearchResults};
use serde_json::{Value, json};

/// Raw issue JSON with the fields the bot requests.
pub fn issue_json(key: &str, summary: &str, status: &str, assignee: Option<&str>) -> Value {
  json!({
      "id": format!("{}", 10_000 + key.len()),
      "key": key,
      "fields": {
          "summary": summary,
          "status": { "id": "1", "name": status },
          "priority": { "name": "High" },
          "assignee": assignee.map(|name| json!({ "accountId": format!("acc-{name}"), "displayName": name })),
          "issuetype": { "name": "Story" },
          "updated": "2024-05-01T10:00:00.000+0000",
          "duedate": "2024-05-10",
          "flagged": null
      }
  })
}

/// Deserialize [`issue_json`] into a typed issue.
pub fn issue(key: &str, summary: &str, status: &str, assignee: Option<&str>) -> JiraIssue {
  serde_json::from_value(issue_json(key, summary, status, assignee)).expect("fixture issue should deserialize")
}

/// Search results holding `count` issues keyed `{project}-1..=count`.
pub fn search_results(project: &str, count: usize) -> JiraSearchResults {
  let issues: Vec<JiraIssue> = (1..=count)
    .map(|n| issue(&format!("{project}-{n}"), &format!("Issue {n}"), "In Progress", None))
    .collect();

  JiraSearchResults {
    start_at: 0,
    max_results: 50,
    total: count as u64,
    issues,
  }
}

/// Search results built from explicit issues.
pub fn results_of(issues: Vec<JiraIssue>) -> JiraSearchResults {
  JiraSearchResults {
    start_at: 0,
    max_results: 50,
    total: issues.len() as u64,
    issues,
  }
}

pub fn project(key: &str, name: &str) -> JiraProject {
  JiraProject {
    id: format!("100{}", key.len()),
    key: key.to_string(),
    name: name.to_string(),
    project_type_key: Some("software".to_string()),
  }
}
