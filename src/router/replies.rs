//! Canned reply text.

use jirabot_jira::JiraProject;

pub const HELP: &str = "Here's what I can do:\n\
  • `ask <question>` - Ask about a Jira project, e.g. `ask what's blocked in project R2?`\n\
  • `projects` - List the Jira projects I can see\n\
  • `test jira` - Check my connection to Jira\n\
  • `help` - Show this message\n\n\
  Mention a project with `project KEY` and use words like *sprint*, *blocked*, *high priority* or *workload* \
  to focus the answer. Without a project I'll summarize the last week across all projects.";

pub const WELCOME: &str = "👋 Hi everyone! I'm your Jira assistant. Ask me about sprints, blockers, \
  priorities or team workload with `ask <question>`, or type `help` to see everything I can do.";

pub const JIRA_CONNECTED: &str = "✅ Successfully connected to Jira!";

pub const JIRA_CONNECTION_FAILED: &str =
  "❌ Failed to connect to Jira. Please check your credentials and configuration.";

pub const NO_USABLE_DATA: &str =
  "Sorry, I'm having trouble accessing the Jira data right now. Try `test jira` to check the connection.";

pub const GENERIC_ERROR: &str = "Sorry, an error occurred while processing your request.";

pub const EMPTY_QUESTION: &str = "Please include a question after `ask`, e.g. `ask what's blocked in project R2?`";

pub const PROJECTS_FAILED: &str = "Sorry, I couldn't list the Jira projects right now.";

pub const NO_PROJECTS: &str = "I can't see any Jira projects with the configured account.";

/// Projects listed per reply.
pub const MAX_LISTED_PROJECTS: usize = 50;

pub fn greeting(user: &str) -> String {
  format!("Hey there <@{user}>! 👋")
}

/// One bullet per project (bold key, then name), capped at [`MAX_LISTED_PROJECTS`].
pub fn project_list(projects: &[JiraProject]) -> String {
  if projects.is_empty() {
    return NO_PROJECTS.to_string();
  }

  let mut lines = vec![format!("Here are the Jira projects I can see ({}):", projects.len())];
  lines.extend(
    projects
      .iter()
      .take(MAX_LISTED_PROJECTS)
      .map(|p| format!("• *{}* — {}", p.key, p.name)),
  );
  if projects.len() > MAX_LISTED_PROJECTS {
    lines.push(format!("…and {} more", projects.len() - MAX_LISTED_PROJECTS));
  }
  lines.join("\n")
}
