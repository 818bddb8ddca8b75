//! JQL expressions behind each question category.

/// Issues returned by a recent-updates query when no limit is given.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Look-back window, in days, of the cross-project fallback search.
pub const GLOBAL_WINDOW_DAYS: u32 = 7;

/// Quote a project key as a JQL string literal.
pub fn quote(value: &str) -> String {
  let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
  format!("\"{escaped}\"")
}

pub fn recent_updates(project_key: &str) -> String {
  format!("project = {} ORDER BY updated DESC", quote(project_key))
}

pub fn open_sprint(project_key: &str) -> String {
  format!("project = {} AND sprint in openSprints()", quote(project_key))
}

/// Issues in a Blocked status or flagged as an impediment, both scoped to the
/// project.
pub fn blocked(project_key: &str) -> String {
  format!(
    "project = {} AND (status = Blocked OR flagged = Impediment)",
    quote(project_key)
  )
}

pub fn high_priority(project_key: &str) -> String {
  format!(
    "project = {} AND priority in (Highest, High) AND status not in (Done, Closed)",
    quote(project_key)
  )
}

pub fn team_workload(project_key: &str) -> String {
  format!(
    "project = {} AND status not in (Done, Closed) ORDER BY assignee",
    quote(project_key)
  )
}

pub fn updated_within_days(days: u32) -> String {
  format!("updated >= -{days}d ORDER BY updated DESC")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_quote_escapes() {
    assert_eq!(quote("R2"), "\"R2\"");
    assert_eq!(quote("A\"B"), "\"A\\\"B\"");
  }

  #[test]
  fn test_blocked_is_scoped_to_project() {
    assert_eq!(
      blocked("R2"),
      "project = \"R2\" AND (status = Blocked OR flagged = Impediment)"
    );
  }

  #[test]
  fn test_project_queries() {
    assert_eq!(recent_updates("CORE"), "project = \"CORE\" ORDER BY updated DESC");
    assert_eq!(open_sprint("CORE"), "project = \"CORE\" AND sprint in openSprints()");
    assert_eq!(
      high_priority("CORE"),
      "project = \"CORE\" AND priority in (Highest, High) AND status not in (Done, Closed)"
    );
    assert_eq!(
      team_workload("CORE"),
      "project = \"CORE\" AND status not in (Done, Closed) ORDER BY assignee"
    );
  }

  #[test]
  fn test_updated_within_days() {
    assert_eq!(updated_within_days(GLOBAL_WINDOW_DAYS), "updated >= -7d ORDER BY updated DESC");
  }
}
