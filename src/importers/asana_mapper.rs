use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::model::asana::{AsanaPriority, AsanaRow, AsanaSwimlane};
use crate::model::import::{ImportResult, Issue, IssueStatus, Label, User};

/// Which Asana column decides the destination status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    /// Translate the board section through the status table.
    #[default]
    Column,
    /// Done when the task has a completion timestamp, Todo otherwise.
    Completion,
}

impl StatusSource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "column" => Some(StatusSource::Column),
            "completion" => Some(StatusSource::Completion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    /// Prefix for links back to the original task. The task id is appended verbatim.
    pub link_base: Option<String>,
    pub status_source: StatusSource,
}

#[cfg(test)]
impl MapOptions {
    pub fn with_link_base(link_base: impl Into<String>) -> Self {
        Self {
            link_base: Some(link_base.into()),
            ..Default::default()
        }
    }
}

pub fn map_priority(raw: &str) -> u8 {
    match AsanaPriority::parse(raw) {
        Some(priority) => priority.weight(),
        None => 0,
    }
}

pub fn map_status(raw: &str) -> IssueStatus {
    match AsanaSwimlane::parse(raw) {
        Some(AsanaSwimlane::ToDo) => IssueStatus::Todo,
        Some(AsanaSwimlane::InProgress) => IssueStatus::InProgress,
        Some(AsanaSwimlane::InReview) => IssueStatus::InReview,
        Some(AsanaSwimlane::InQa) => IssueStatus::InTesting,
        Some(AsanaSwimlane::Done) => IssueStatus::Done,
        Some(AsanaSwimlane::Blocked) | None => IssueStatus::Backlog,
    }
}

fn completion_status(completed_at: &str) -> IssueStatus {
    if completed_at.is_empty() {
        IssueStatus::Todo
    } else {
        IssueStatus::Done
    }
}

/// Parse a due date the way a lenient date constructor would: full timestamps,
/// ISO dates (midnight UTC) and US-style `mm/dd/yyyy`.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Leading-integer parse: `"3"`, `" 5 pts"` and `"2.5"` all yield a number.
/// Zero, negatives and text without leading digits yield `None`; digit runs
/// too large for `u64` saturate.
pub fn parse_estimate(raw: &str) -> Option<u64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    if negative || value == 0 {
        None
    } else {
        Some(value)
    }
}

pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn back_link(base: Option<&str>, task_id: &str) -> Option<String> {
    base.map(|base| format!("{base}{task_id}"))
}

fn describe(notes: &str, url: Option<&str>, to_markdown: &impl Fn(&str) -> String) -> String {
    let body = to_markdown(notes);
    match url {
        Some(url) => format!("{body}\n\n[View original issue in Asana]({url})"),
        None => body,
    }
}

/// Map exported Asana rows into an import document.
///
/// Every assignee email in `rows` becomes a user, including emails that only
/// appear on rows dropped for having no title.
pub fn map_rows(
    rows: &[AsanaRow],
    options: &MapOptions,
    to_markdown: impl Fn(&str) -> String,
) -> ImportResult {
    let mut result = ImportResult::default();

    let assignees: BTreeSet<&str> = rows.iter().map(|r| r.assignee_email.as_str()).collect();
    for email in assignees {
        result.users.insert(
            email.to_string(),
            User {
                name: email.to_string(),
            },
        );
    }

    let link_base = options.link_base.as_deref();

    for (idx, row) in rows.iter().enumerate() {
        if row.name.is_empty() {
            tracing::debug!(row = idx + 1, task_id = %row.task_id, "skipping row without a title");
            continue;
        }

        let url = back_link(link_base, &row.task_id);
        let description = describe(&row.notes, url.as_deref(), &to_markdown);

        let status = match options.status_source {
            StatusSource::Column => map_status(&row.section),
            StatusSource::Completion => completion_status(&row.completed_at),
        };

        let due_date = if row.due_date.is_empty() {
            None
        } else {
            let parsed = parse_due_date(&row.due_date);
            if parsed.is_none() {
                tracing::warn!(task_id = %row.task_id, due_date = %row.due_date, "unparseable due date");
            }
            parsed
        };

        let labels = split_tags(&row.tags);
        let assignee_id = if row.assignee_email.is_empty() {
            None
        } else {
            Some(row.assignee_email.clone())
        };

        for label in &labels {
            if !result.labels.contains_key(label) {
                result
                    .labels
                    .insert(label.clone(), Label { name: label.clone() });
            }
        }

        result.issues.push(Issue {
            title: row.name.clone(),
            description,
            status,
            priority: map_priority(&row.priority_rank),
            url,
            assignee_id,
            labels,
            due_date,
            estimate: parse_estimate(&row.effort),
        });
    }

    tracing::info!(
        rows = rows.len(),
        issues = result.issues.len(),
        users = result.users.len(),
        labels = result.labels.len(),
        "mapped Asana rows"
    );

    result
}
