use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::asana_mapper::{map_rows, MapOptions, StatusSource};
use super::Importer;
use crate::error::{ImportError, Result};
use crate::model::asana::AsanaRow;
use crate::model::import::ImportResult;
use crate::util::jira_markup;

/// Import issues from an Asana CSV export.
pub struct AsanaCsvImporter {
    file_path: PathBuf,
    org_url: Option<String>,
    status_source: StatusSource,
}

impl AsanaCsvImporter {
    /// `org_url` is the base project URL that task ids are appended to.
    pub fn new(file_path: impl Into<PathBuf>, org_url: Option<String>) -> Self {
        Self {
            file_path: file_path.into(),
            org_url: org_url.filter(|url| !url.is_empty()),
            status_source: StatusSource::default(),
        }
    }

    pub fn with_status_source(mut self, status_source: StatusSource) -> Self {
        self.status_source = status_source;
        self
    }

    fn map_options(&self) -> MapOptions {
        MapOptions {
            link_base: self.org_url.clone(),
            status_source: self.status_source,
        }
    }
}

#[async_trait]
impl Importer for AsanaCsvImporter {
    fn name(&self) -> &str {
        "Asana (CSV)"
    }

    fn default_team_name(&self) -> &str {
        "Asana"
    }

    async fn import(&self) -> Result<ImportResult> {
        let contents = tokio::fs::read_to_string(&self.file_path)
            .await
            .map_err(|source| ImportError::FileRead {
                path: self.file_path.clone(),
                source,
            })?;
        let rows = parse_rows(&contents, &self.file_path)?;
        tracing::info!(path = %self.file_path.display(), rows = rows.len(), "read Asana export");

        Ok(map_rows(&rows, &self.map_options(), jira_markup::to_markdown))
    }
}

/// Parse CSV text into rows, matching columns by header name.
pub fn parse_rows(contents: &str, path: &Path) -> Result<Vec<AsanaRow>> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<AsanaRow>, _>>()
        .map_err(|source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Task ID,Created At,Completed At,Last Modified,Name,Assignee,Assignee Email,Start Date,Due Date,Tags,Notes,Projects,Section/Column,Effort,Parent Task,Priority Rank";

    fn path() -> PathBuf {
        PathBuf::from("export.csv")
    }

    #[test]
    fn parses_full_row() {
        let csv = format!(
            "{HEADER}\n123,2024-01-01,,2024-01-02,Fix bug,Ann,a@x.com,,2024-02-01,\"bug,urgent\",\"Line one\nLine two\",Web,In Progress,3,,High\n"
        );
        let rows = parse_rows(&csv, &path()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.task_id, "123");
        assert_eq!(row.name, "Fix bug");
        assert_eq!(row.assignee, "Ann");
        assert_eq!(row.assignee_email, "a@x.com");
        assert_eq!(row.tags, "bug,urgent");
        assert_eq!(row.notes, "Line one\nLine two");
        assert_eq!(row.section, "In Progress");
        assert_eq!(row.effort, "3");
        assert_eq!(row.priority_rank, "High");
    }

    #[test]
    fn strips_byte_order_mark() {
        let csv = "\u{feff}Task ID,Name\n1,Title\n";
        let rows = parse_rows(csv, &path()).unwrap();
        assert_eq!(rows[0].task_id, "1");
        assert_eq!(rows[0].name, "Title");
    }

    #[test]
    fn missing_columns_are_empty() {
        let csv = "Name,Assignee Email\nOnly title,\n";
        let rows = parse_rows(csv, &path()).unwrap();
        assert_eq!(rows[0].name, "Only title");
        assert_eq!(rows[0].tags, "");
        assert_eq!(rows[0].priority_rank, "");
    }

    #[test]
    fn header_only_yields_no_rows() {
        let rows = parse_rows(HEADER, &path()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn trims_padded_cells() {
        let csv = "Name,Assignee Email,Priority Rank,Section/Column,Tags\nFix bug, a@x.com , High, Done,bug\n";
        let rows = parse_rows(csv, &path()).unwrap();
        assert_eq!(rows[0].assignee_email, "a@x.com");
        assert_eq!(rows[0].priority_rank, "High");
        assert_eq!(rows[0].section, "Done");

        let result = map_rows(&rows, &MapOptions::default(), |s| s.to_string());
        let issue = &result.issues[0];
        assert_eq!(issue.priority, 2);
        assert_eq!(issue.status, crate::model::import::IssueStatus::Done);
        assert_eq!(issue.assignee_id.as_deref(), Some("a@x.com"));
        let users: Vec<&str> = result.users.keys().map(String::as_str).collect();
        assert_eq!(users, vec!["a@x.com"]);
    }

    #[test]
    fn duplicate_header_is_a_csv_error() {
        let err = parse_rows("Name,Name\na,b\n", &path()).unwrap_err();
        assert!(matches!(err, ImportError::Csv { .. }));
        assert!(err.to_string().contains("export.csv"));
    }

    #[tokio::test]
    async fn invalid_utf8_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.csv");
        std::fs::write(&file, [0x4e, 0x61, 0x6d, 0x65, 0x0a, 0xff, 0xfe, 0x0a]).unwrap();
        let err = AsanaCsvImporter::new(&file, None).import().await.unwrap_err();
        assert!(matches!(err, ImportError::FileRead { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }
}
