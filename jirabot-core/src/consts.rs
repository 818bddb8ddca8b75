//! Constants shared across jirabot components.

/// User-Agent header value sent by every outbound HTTP client.
pub const USER_AGENT: &str = concat!("jirabot/", env!("CARGO_PKG_VERSION"));

/// Environment variable for the Jira host URL.
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";
/// Environment variable for the Jira account email used for basic auth.
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
/// Environment variable for the Jira API token.
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
/// Environment variable naming the custom field that stores story points.
pub const ENV_JIRA_STORY_POINTS_FIELD: &str = "JIRA_STORY_POINTS_FIELD";

pub const ENV_SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
pub const ENV_SLACK_APP_TOKEN: &str = "SLACK_APP_TOKEN";
pub const ENV_SLACK_SIGNING_SECRET: &str = "SLACK_SIGNING_SECRET";

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_MAX_TOKENS: &str = "OPENAI_MAX_TOKENS";
