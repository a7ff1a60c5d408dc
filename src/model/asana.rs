use serde::Deserialize;
use std::fmt;

/// One row of an Asana CSV export. Columns missing from the file come through as empty strings.
#[allow(dead_code)] // mirrors the full export column set, not all of it is mapped
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AsanaRow {
    #[serde(rename = "Task ID")]
    pub task_id: String,
    #[serde(rename = "Created At")]
    pub created_at: String,
    #[serde(rename = "Completed At")]
    pub completed_at: String,
    #[serde(rename = "Last Modified")]
    pub last_modified: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Assignee")]
    pub assignee: String,
    #[serde(rename = "Assignee Email")]
    pub assignee_email: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "Due Date")]
    pub due_date: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Projects")]
    pub projects: String,
    #[serde(rename = "Section/Column")]
    pub section: String,
    #[serde(rename = "Effort")]
    pub effort: String,
    #[serde(rename = "Parent Task")]
    pub parent_task: String,
    #[serde(rename = "Priority Rank")]
    pub priority_rank: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsanaPriority {
    High,
    Medium,
    Low,
}

impl AsanaPriority {
    #[cfg(test)]
    pub const ALL: [AsanaPriority; 3] = [
        AsanaPriority::High,
        AsanaPriority::Medium,
        AsanaPriority::Low,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "High" => Some(AsanaPriority::High),
            "Medium" => Some(AsanaPriority::Medium),
            "Low" => Some(AsanaPriority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AsanaPriority::High => "High",
            AsanaPriority::Medium => "Medium",
            AsanaPriority::Low => "Low",
        }
    }

    /// Destination priority weight (lower is more urgent, 0 means none).
    pub fn weight(&self) -> u8 {
        match self {
            AsanaPriority::High => 2,
            AsanaPriority::Medium => 3,
            AsanaPriority::Low => 4,
        }
    }
}

impl fmt::Display for AsanaPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board section a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsanaSwimlane {
    ToDo,
    InProgress,
    InReview,
    InQa,
    Blocked,
    Done,
}

impl AsanaSwimlane {
    #[cfg(test)]
    pub const ALL: [AsanaSwimlane; 6] = [
        AsanaSwimlane::ToDo,
        AsanaSwimlane::InProgress,
        AsanaSwimlane::InReview,
        AsanaSwimlane::InQa,
        AsanaSwimlane::Blocked,
        AsanaSwimlane::Done,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "To Do" => Some(AsanaSwimlane::ToDo),
            "In Progress" => Some(AsanaSwimlane::InProgress),
            "In Review" => Some(AsanaSwimlane::InReview),
            "In QA" => Some(AsanaSwimlane::InQa),
            "Blocked" => Some(AsanaSwimlane::Blocked),
            "Done" => Some(AsanaSwimlane::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AsanaSwimlane::ToDo => "To Do",
            AsanaSwimlane::InProgress => "In Progress",
            AsanaSwimlane::InReview => "In Review",
            AsanaSwimlane::InQa => "In QA",
            AsanaSwimlane::Blocked => "Blocked",
            AsanaSwimlane::Done => "Done",
        }
    }
}

impl fmt::Display for AsanaSwimlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
