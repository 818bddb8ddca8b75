use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents Jira authentication credentials
#[derive(Clone)]
pub struct JiraAuth {
  pub username: String,
  pub api_token: String,
}

impl fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraAuth")
      .field("username", &self.username)
      .field("api_token", &"[REDACTED]")
      .finish()
  }
}

/// Represents a Jira issue
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
  #[serde(default)]
  pub id: String,
  pub key: String,
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraIssueFields {
  #[serde(default)]
  pub summary: String,
  #[serde(default)]
  pub status: JiraIssueStatus,
  #[serde(default)]
  pub priority: Option<JiraPriority>,
  #[serde(default)]
  pub assignee: Option<JiraUser>,
  #[serde(default)]
  pub issuetype: Option<JiraIssueType>,
  #[serde(default)]
  pub updated: Option<String>,
  #[serde(default)]
  pub duedate: Option<String>,
  /// Passed through verbatim; Jira returns either null or a list of options.
  #[serde(default)]
  pub flagged: Option<Value>,
  /// Resolved from the configured custom field after a search.
  #[serde(skip)]
  pub story_points: Option<f64>,
  /// Fields without a typed slot, keyed by field id (`customfield_10016`).
  #[serde(flatten)]
  pub custom: Map<String, Value>,
}

impl JiraIssueFields {
  /// Read a numeric custom field.
  pub fn custom_number(&self, field_id: &str) -> Option<f64> {
    self.custom.get(field_id).and_then(Value::as_f64)
  }

  pub fn status_name(&self) -> &str {
    &self.status.name
  }

  pub fn priority_name(&self) -> Option<&str> {
    self.priority.as_ref().map(|p| p.name.as_str())
  }

  pub fn assignee_name(&self) -> Option<&str> {
    self.assignee.as_ref().and_then(|a| a.display_name.as_deref())
  }

  pub fn issuetype_name(&self) -> Option<&str> {
    self.issuetype.as_ref().map(|t| t.name.as_str())
  }
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraIssueStatus {
  #[serde(default)]
  pub id: Option<String>,
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraPriority {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueType {
  #[serde(default)]
  pub name: String,
}

/// A Jira user, as returned for assignees and by `/myself`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(default)]
  pub account_id: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(default)]
  pub email_address: Option<String>,
}

/// Project metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraProject {
  pub id: String,
  pub key: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project_type_key: Option<String>,
}

/// One page of `/search` results
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearchResults {
  #[serde(default)]
  pub start_at: u64,
  #[serde(default)]
  pub max_results: u64,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
}

impl JiraSearchResults {
  /// Populate `story_points` on every issue from the given custom field.
  pub(crate) fn resolve_story_points(&mut self, field_id: &str) {
    for issue in &mut self.issues {
      issue.fields.story_points = issue.fields.custom_number(field_id);
    }
  }
}

/// Request body for `POST /rest/api/2/search`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraSearchRequest<'a> {
  pub jql: &'a str,
  pub start_at: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_results: Option<u32>,
  pub fields: Vec<String>,
}

/// One page of `/project/search` results
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraProjectPage {
  #[serde(default)]
  pub values: Vec<JiraProject>,
  #[serde(default = "default_true")]
  pub is_last: bool,
}

const fn default_true() -> bool {
  true
}
