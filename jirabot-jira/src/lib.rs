//! # Jira API Client
//!
//! Provides the tracker gateway used by jirabot: a Jira REST client, the
//! issue and project models it returns, the JQL expressions behind each
//! question category, and the [`TrackerGateway`] trait the router depends on.

mod client;
mod endpoints;
pub mod error;
pub mod gateway;
pub mod jql;
pub mod models;

pub use client::{JiraClient, create_jira_client};
pub use error::TrackerError;
pub use gateway::TrackerGateway;
pub use models::{
  JiraAuth, JiraIssue, JiraIssueFields, JiraIssueStatus, JiraIssueType, JiraPriority, JiraProject, JiraSearchResults,
  JiraUser,
};
