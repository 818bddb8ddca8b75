//! # Tracker Gateway
//!
//! The query surface the conversation router depends on. Implementors supply
//! four primitive calls; every question category is a provided method built
//! from [`crate::jql`] on top of [`TrackerGateway::search_issues`], so test
//! doubles only override what they need to observe.

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::client::JiraClient;
use crate::error::TrackerError;
use crate::jql;
use crate::models::{JiraProject, JiraSearchResults, JiraUser};

/// Run a search for one question category with uniform logging.
async fn category_search<G>(
  gateway: &G,
  category: &str,
  jql: String,
  max_results: Option<u32>,
) -> Result<JiraSearchResults, TrackerError>
where
  G: TrackerGateway + ?Sized,
{
  debug!(category, %jql, "Querying Jira");
  match gateway.search_issues(&jql, max_results).await {
    Ok(results) => {
      info!(category, count = results.issues.len(), "Retrieved {category}");
      Ok(results)
    }
    Err(e) => {
      error!(category, %jql, status = ?e.status(), "Error getting {category}: {e}");
      Err(e)
    }
  }
}

#[async_trait]
pub trait TrackerGateway: Send + Sync {
  /// Run an arbitrary JQL search.
  async fn search_issues(&self, jql: &str, max_results: Option<u32>) -> Result<JiraSearchResults, TrackerError>;

  /// Fetch project metadata.
  async fn get_project_info(&self, project_key: &str) -> Result<JiraProject, TrackerError>;

  /// List projects visible to the configured account.
  async fn list_projects(&self) -> Result<Vec<JiraProject>, TrackerError>;

  /// Fetch the authenticated identity.
  async fn current_user(&self) -> Result<JiraUser, TrackerError>;

  /// Most recently updated issues first.
  async fn get_recent_updates(&self, project_key: &str, limit: u32) -> Result<JiraSearchResults, TrackerError> {
    category_search(self, "recent updates", jql::recent_updates(project_key), Some(limit)).await
  }

  /// Issues in currently open sprints.
  async fn get_sprint_info(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    category_search(self, "sprint issues", jql::open_sprint(project_key), None).await
  }

  async fn get_blocked_issues(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    category_search(self, "blocked issues", jql::blocked(project_key), None).await
  }

  async fn get_high_priority_issues(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    category_search(self, "high priority issues", jql::high_priority(project_key), None).await
  }

  /// Active issues ordered by assignee.
  async fn get_team_workload(&self, project_key: &str) -> Result<JiraSearchResults, TrackerError> {
    category_search(self, "active issues", jql::team_workload(project_key), None).await
  }

  /// Issues updated in the last `days` days across every project.
  async fn search_recent_across_projects(&self, days: u32) -> Result<JiraSearchResults, TrackerError> {
    category_search(self, "recent updates across projects", jql::updated_within_days(days), None).await
  }

  /// Verify credentials. Never fails; any error is logged and reported as
  /// `false`.
  async fn test_connection(&self) -> bool {
    debug!("Testing Jira connection");
    match self.current_user().await {
      Ok(user) => {
        info!(
          username = ?user.name,
          email = ?user.email_address,
          display_name = ?user.display_name,
          "Successfully connected to Jira"
        );
        true
      }
      Err(e) => {
        error!(status = ?e.status(), "Error testing Jira connection: {e}");
        false
      }
    }
  }
}

#[async_trait]
impl TrackerGateway for JiraClient {
  async fn search_issues(&self, jql: &str, max_results: Option<u32>) -> Result<JiraSearchResults, TrackerError> {
    self.search(jql, max_results).await
  }

  async fn get_project_info(&self, project_key: &str) -> Result<JiraProject, TrackerError> {
    self.project(project_key).await
  }

  async fn list_projects(&self) -> Result<Vec<JiraProject>, TrackerError> {
    self.projects().await
  }

  async fn current_user(&self) -> Result<JiraUser, TrackerError> {
    self.myself().await
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{body_partial_json, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::create_jira_client;

  fn empty_results() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "issues": [] }))
  }

  #[tokio::test]
  async fn test_connection_reports_false_on_unauthorized() {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "bad_token").unwrap();

    Mock::given(method("GET"))
      .and(path("/rest/api/2/myself"))
      .respond_with(ResponseTemplate::new(401).set_body_json(json!({
          "errorMessages": ["You are not authenticated."]
      })))
      .mount(&mock_server)
      .await;

    assert!(!client.test_connection().await);
  }

  #[tokio::test]
  async fn test_connection_reports_false_when_unreachable() {
    let client = create_jira_client("http://127.0.0.1:9", "test_user", "test_token").unwrap();
    assert!(!client.test_connection().await);
  }

  #[tokio::test]
  async fn test_connection_reports_true() {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token").unwrap();

    Mock::given(method("GET"))
      .and(path("/rest/api/2/myself"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "displayName": "Test User" })))
      .mount(&mock_server)
      .await;

    assert!(client.test_connection().await);
  }

  #[tokio::test]
  async fn test_category_queries_send_expected_jql() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;

    let expectations = [
      json!({ "jql": "project = \"R2\" ORDER BY updated DESC", "maxResults": 10 }),
      json!({ "jql": "project = \"R2\" AND sprint in openSprints()" }),
      json!({ "jql": "project = \"R2\" AND (status = Blocked OR flagged = Impediment)" }),
      json!({ "jql": "project = \"R2\" AND priority in (Highest, High) AND status not in (Done, Closed)" }),
      json!({ "jql": "project = \"R2\" AND status not in (Done, Closed) ORDER BY assignee" }),
      json!({ "jql": "updated >= -7d ORDER BY updated DESC" }),
    ];
    for body in expectations {
      Mock::given(method("POST"))
        .and(path("/rest/api/2/search"))
        .and(body_partial_json(body))
        .respond_with(empty_results())
        .expect(1)
        .mount(&mock_server)
        .await;
    }

    client.get_recent_updates("R2", jql::DEFAULT_RECENT_LIMIT).await?;
    client.get_sprint_info("R2").await?;
    client.get_blocked_issues("R2").await?;
    client.get_high_priority_issues("R2").await?;
    client.get_team_workload("R2").await?;
    client.search_recent_across_projects(jql::GLOBAL_WINDOW_DAYS).await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_category_query_propagates_error() {
    let mock_server = MockServer::start().await;
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token").unwrap();

    Mock::given(method("POST"))
      .and(path("/rest/api/2/search"))
      .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
      .mount(&mock_server)
      .await;

    let err = client.get_sprint_info("R2").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.message(), "boom");
  }
}
