//! Command and keyword detection for incoming messages.

use std::sync::LazyLock;

use regex::Regex;

use crate::bundle::Slot;

static PROJECT_KEY_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)project\s+([A-Za-z0-9]+)").expect("Failed to compile project key regex"));

// Whole word only, so "othello" or "hellooo" is not a greeting.
static HELLO_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\bhello\b").expect("Failed to compile greeting regex"));

/// What a message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Greeting,
  Help,
  TestJira,
  Projects,
  /// `ask <question>`; the question may be empty.
  Ask(String),
}

/// Recognize a command in message text with any leading mention already removed.
pub fn parse_command(text: &str) -> Option<Command> {
  let text = text.trim();

  if let Some(prefix) = text.get(..3)
    && prefix.eq_ignore_ascii_case("ask")
  {
    let rest = &text[3..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
      return Some(Command::Ask(rest.trim().to_string()));
    }
  }

  let lower = text.to_lowercase();
  match lower.as_str() {
    "help" => Some(Command::Help),
    "test jira" => Some(Command::TestJira),
    "projects" => Some(Command::Projects),
    "hi" | "hey" => Some(Command::Greeting),
    _ if HELLO_PATTERN.is_match(text) => Some(Command::Greeting),
    _ => None,
  }
}

/// Question categories detected from keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Topics {
  pub sprint: bool,
  pub blocked: bool,
  pub high_priority: bool,
  pub workload: bool,
}

impl Topics {
  pub fn detect(question: &str) -> Self {
    let lower = question.to_lowercase();
    Self {
      sprint: lower.contains("sprint"),
      blocked: lower.contains("blocked") || lower.contains("impediment"),
      high_priority: lower.contains("high priority") || lower.contains("urgent"),
      workload: lower.contains("workload") || lower.contains("who has"),
    }
  }

  pub fn any(self) -> bool {
    self.sprint || self.blocked || self.high_priority || self.workload
  }

  /// Slots to gather, in query order.
  pub fn slots(self) -> Vec<Slot> {
    [
      (Slot::SprintInfo, self.sprint),
      (Slot::BlockedIssues, self.blocked),
      (Slot::HighPriorityIssues, self.high_priority),
      (Slot::TeamWorkload, self.workload),
    ]
    .into_iter()
    .filter_map(|(slot, wanted)| wanted.then_some(slot))
    .collect()
  }
}

/// First `project <KEY>` mention, upper-cased.
pub fn extract_project_key(question: &str) -> Option<String> {
  PROJECT_KEY_PATTERN
    .captures(question)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().to_uppercase())
}

/// Which tracker queries answer a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
  /// Project info plus the topic slots, or recent updates when no topic matched.
  Project { key: String, topics: Topics },
  /// Recent updates across every project.
  Global,
}

impl QueryPlan {
  pub fn for_question(question: &str) -> Self {
    match extract_project_key(question) {
      Some(key) => QueryPlan::Project {
        key,
        topics: Topics::detect(question),
      },
      None => QueryPlan::Global,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse_command("help"), Some(Command::Help));
    assert_eq!(parse_command("  HELP "), Some(Command::Help));
    assert_eq!(parse_command("Test Jira"), Some(Command::TestJira));
    assert_eq!(parse_command("projects"), Some(Command::Projects));
    assert_eq!(parse_command("hello there"), Some(Command::Greeting));
    assert_eq!(parse_command("Hey"), Some(Command::Greeting));
    assert_eq!(parse_command("hi"), Some(Command::Greeting));
    assert_eq!(parse_command("this is fine"), None);
    assert_eq!(parse_command("helpful tips"), None);
    assert_eq!(parse_command("othello"), None);
    assert_eq!(parse_command("hellooo"), None);
    assert_eq!(parse_command("well, Hello!"), Some(Command::Greeting));
  }

  #[test]
  fn test_parse_ask_keeps_question_case() {
    assert_eq!(
      parse_command("Ask What's blocked in project R2?"),
      Some(Command::Ask("What's blocked in project R2?".to_string()))
    );
    assert_eq!(parse_command("ask"), Some(Command::Ask(String::new())));
    assert_eq!(parse_command("ask hello"), Some(Command::Ask("hello".to_string())));
    assert_eq!(parse_command("asking around"), None);
  }

  #[test]
  fn test_extract_project_key() {
    assert_eq!(extract_project_key("what's blocked in project r2?"), Some("R2".to_string()));
    assert_eq!(extract_project_key("PROJECT   abc123 sprint"), Some("ABC123".to_string()));
    assert_eq!(
      extract_project_key("project ONE and project TWO"),
      Some("ONE".to_string())
    );
    assert_eq!(extract_project_key("status"), None);
    assert_eq!(extract_project_key("projects overview"), None);
  }

  #[test]
  fn test_detect_topics() {
    let topics = Topics::detect("Who has the most URGENT work in the sprint?");
    assert_eq!(
      topics,
      Topics {
        sprint: true,
        blocked: false,
        high_priority: true,
        workload: true,
      }
    );
    assert_eq!(
      topics.slots(),
      vec![Slot::SprintInfo, Slot::HighPriorityIssues, Slot::TeamWorkload]
    );

    assert!(Topics::detect("any impediments?").blocked);
    assert!(Topics::detect("high priority items").high_priority);
    assert!(!Topics::detect("status").any());
  }

  #[test]
  fn test_query_plan() {
    assert_eq!(
      QueryPlan::for_question("what's blocked in project R2?"),
      QueryPlan::Project {
        key: "R2".to_string(),
        topics: Topics {
          blocked: true,
          ..Topics::default()
        },
      }
    );
    assert_eq!(QueryPlan::for_question("status"), QueryPlan::Global);
  }
}
