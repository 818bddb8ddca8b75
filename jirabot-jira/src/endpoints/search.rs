//! # Jira Issue Search
//!
//! JQL search with an explicit field list so every issue carries what the
//! data filter projects.

use tracing::{debug, info};

use crate::client::JiraClient;
use crate::error::{TrackerError, check_response};
use crate::models::{JiraSearchRequest, JiraSearchResults};

/// Fields requested on every search, in addition to the story-point field.
const SEARCH_FIELDS: &[&str] = &[
  "summary",
  "status",
  "priority",
  "assignee",
  "issuetype",
  "updated",
  "duedate",
  "flagged",
];

impl JiraClient {
  fn search_fields(&self) -> Vec<String> {
    let mut fields: Vec<String> = SEARCH_FIELDS.iter().map(|f| f.to_string()).collect();
    if let Some(field) = &self.story_points_field {
      fields.push(field.clone());
    }
    fields
  }

  /// Run a JQL search. `max_results` of `None` leaves the page size to Jira.
  pub async fn search(&self, jql: &str, max_results: Option<u32>) -> Result<JiraSearchResults, TrackerError> {
    debug!(jql, ?max_results, "Searching Jira");

    let request = JiraSearchRequest {
      jql,
      start_at: 0,
      max_results,
      fields: self.search_fields(),
    };

    let response = self
      .post("/rest/api/2/search")
      .json(&request)
      .send()
      .await
      .map_err(TrackerError::Transport)?;
    let response = check_response(response, "Search").await?;

    let mut results = response
      .json::<JiraSearchResults>()
      .await
      .map_err(TrackerError::Decode)?;

    if let Some(field) = &self.story_points_field {
      results.resolve_story_points(field);
    }

    info!(
      total = results.total,
      returned = results.issues.len(),
      "Retrieved Jira issues"
    );
    Ok(results)
  }
}
