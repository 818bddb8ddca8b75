use tracing::debug;

use crate::client::JiraClient;
use crate::error::{TrackerError, check_response};
use crate::models::JiraUser;

impl JiraClient {
  /// Fetch the authenticated user
  pub async fn myself(&self) -> Result<JiraUser, TrackerError> {
    debug!("Fetching current Jira user");

    let response = self
      .get("/rest/api/2/myself")
      .send()
      .await
      .map_err(TrackerError::Transport)?;
    let response = check_response(response, "Current user").await?;

    response.json::<JiraUser>().await.map_err(TrackerError::Decode)
  }
}
