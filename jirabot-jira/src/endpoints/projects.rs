//! # Jira Project Endpoints

use tracing::{debug, info};

use crate::client::JiraClient;
use crate::error::{TrackerError, check_response};
use crate::models::{JiraProject, JiraProjectPage};

/// Upper bound on pages fetched by [`JiraClient::projects`].
const MAX_PROJECT_PAGES: usize = 20;
const PROJECT_PAGE_SIZE: usize = 50;

impl JiraClient {
  /// Get a project by key
  pub async fn project(&self, project_key: &str) -> Result<JiraProject, TrackerError> {
    debug!(project_key, "Fetching Jira project");

    let response = self
      .get(&format!("/rest/api/2/project/{project_key}"))
      .send()
      .await
      .map_err(TrackerError::Transport)?;
    let response = check_response(response, &format!("Project {project_key}")).await?;

    let project = response.json::<JiraProject>().await.map_err(TrackerError::Decode)?;
    info!(id = %project.id, key = %project.key, name = %project.name, "Retrieved project info");
    Ok(project)
  }

  /// List every project visible to the authenticated user
  pub async fn projects(&self) -> Result<Vec<JiraProject>, TrackerError> {
    let mut projects = Vec::new();

    for page_index in 0..MAX_PROJECT_PAGES {
      let start_at = page_index * PROJECT_PAGE_SIZE;
      debug!(start_at, "Fetching Jira project page");

      let response = self
        .get("/rest/api/2/project/search")
        .query(&[("startAt", start_at), ("maxResults", PROJECT_PAGE_SIZE)])
        .send()
        .await
        .map_err(TrackerError::Transport)?;
      let response = check_response(response, "Project search").await?;
      let page = response
        .json::<JiraProjectPage>()
        .await
        .map_err(TrackerError::Decode)?;

      let fetched = page.values.len();
      projects.extend(page.values);
      if page.is_last || fetched == 0 {
        break;
      }
    }

    info!(count = projects.len(), "Retrieved Jira projects");
    Ok(projects)
  }
}
