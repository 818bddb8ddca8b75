//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource: issue search, projects and
//! the authenticated user.

pub mod projects;
pub mod search;
pub mod users;
