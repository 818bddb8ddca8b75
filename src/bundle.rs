//! # Query Result Bundle
//!
//! The named collection of tracker results assembled for one question.

use std::fmt;

use jirabot_jira::{JiraProject, JiraSearchResults};

/// One named category within a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  ProjectInfo,
  RecentUpdates,
  SprintInfo,
  BlockedIssues,
  HighPriorityIssues,
  TeamWorkload,
}

impl Slot {
  /// Name used in the serialized bundle and in logs.
  pub fn name(self) -> &'static str {
    match self {
      Slot::ProjectInfo => "projectInfo",
      Slot::RecentUpdates => "recentUpdates",
      Slot::SprintInfo => "sprintInfo",
      Slot::BlockedIssues => "blockedIssues",
      Slot::HighPriorityIssues => "highPriorityIssues",
      Slot::TeamWorkload => "teamWorkload",
    }
  }
}

impl fmt::Display for Slot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Raw tracker results for one question. Every slot is optional.
#[derive(Debug, Clone, Default)]
pub struct QueryResultBundle {
  pub project_info: Option<JiraProject>,
  pub recent_updates: Option<JiraSearchResults>,
  pub sprint_info: Option<JiraSearchResults>,
  pub blocked_issues: Option<JiraSearchResults>,
  pub high_priority_issues: Option<JiraSearchResults>,
  pub team_workload: Option<JiraSearchResults>,
}

impl QueryResultBundle {
  /// Store search results in an issue slot.
  ///
  /// Storing into [`Slot::ProjectInfo`] is ignored; use `project_info`.
  pub fn set_issues(&mut self, slot: Slot, results: JiraSearchResults) {
    let target = match slot {
      Slot::ProjectInfo => return,
      Slot::RecentUpdates => &mut self.recent_updates,
      Slot::SprintInfo => &mut self.sprint_info,
      Slot::BlockedIssues => &mut self.blocked_issues,
      Slot::HighPriorityIssues => &mut self.high_priority_issues,
      Slot::TeamWorkload => &mut self.team_workload,
    };
    *target = Some(results);
  }

  /// Whether any issue slot holds results. Project info alone does not count.
  pub fn has_issue_data(&self) -> bool {
    self.recent_updates.is_some()
      || self.sprint_info.is_some()
      || self.blocked_issues.is_some()
      || self.high_priority_issues.is_some()
      || self.team_workload.is_some()
  }

  /// Slots currently populated, in serialization order.
  pub fn populated_slots(&self) -> Vec<Slot> {
    [
      (Slot::ProjectInfo, self.project_info.is_some()),
      (Slot::RecentUpdates, self.recent_updates.is_some()),
      (Slot::SprintInfo, self.sprint_info.is_some()),
      (Slot::BlockedIssues, self.blocked_issues.is_some()),
      (Slot::HighPriorityIssues, self.high_priority_issues.is_some()),
      (Slot::TeamWorkload, self.team_workload.is_some()),
    ]
    .into_iter()
    .filter_map(|(slot, present)| present.then_some(slot))
    .collect()
  }
}
