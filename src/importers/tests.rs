use std::io::Write;

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::asana_csv::AsanaCsvImporter;
use super::asana_mapper::StatusSource;
use super::Importer;
use crate::error::{ImportError, Result};
use crate::model::import::{ImportResult, IssueStatus};

const EXPORT: &str = "\
Task ID,Created At,Completed At,Last Modified,Name,Assignee,Assignee Email,Start Date,Due Date,Tags,Notes,Projects,Section/Column,Effort,Parent Task,Priority Rank
123,2024-01-01,,2024-01-02,Fix bug,Ann,a@x.com,,2024-02-01,\"bug,urgent\",Crashes when *saving*,Web,In Progress,3,,High
124,2024-01-01,2024-01-05,2024-01-05,,Bo,b@x.com,,,ignored,,Web,Done,,,Low
125,2024-01-01,2024-01-05,2024-01-05,Ship it,,,,,\"release,bug\",,Web,Blocked,abc,,Urgent
";

fn write_export(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[tokio::test]
async fn imports_asana_export() {
    let file = write_export(EXPORT);
    let importer = AsanaCsvImporter::new(
        file.path(),
        Some("https://app.asana.com/0/1/".to_string()),
    );

    let result = importer.import().await.unwrap();

    assert_eq!(result.issues.len(), 2);
    let fix = &result.issues[0];
    assert_eq!(fix.title, "Fix bug");
    assert_eq!(fix.priority, 2);
    assert_eq!(fix.status, IssueStatus::InProgress);
    assert_eq!(fix.estimate, Some(3));
    assert_eq!(
        fix.description,
        "Crashes when **saving**\n\n[View original issue in Asana](https://app.asana.com/0/1/123)"
    );
    assert!(fix.due_date.is_some());

    let ship = &result.issues[1];
    assert_eq!(ship.priority, 0);
    assert_eq!(ship.status, IssueStatus::Backlog);
    assert_eq!(ship.estimate, None);
    assert_eq!(ship.assignee_id, None);

    let users: Vec<&str> = result.users.keys().map(String::as_str).collect();
    assert_eq!(users, vec!["", "a@x.com", "b@x.com"]);
    let labels: Vec<&str> = result.labels.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["bug", "release", "urgent"]);
    assert!(result.statuses.is_empty());
}

#[tokio::test]
async fn empty_org_url_means_no_links() {
    let file = write_export(EXPORT);
    let importer = AsanaCsvImporter::new(file.path(), Some(String::new()));
    let result = importer.import().await.unwrap();
    assert!(result.issues.iter().all(|i| i.url.is_none()));
    assert_eq!(result.issues[0].description, "Crashes when **saving**");
}

#[tokio::test]
async fn completion_status_source_uses_completed_at() {
    let file = write_export(EXPORT);
    let importer =
        AsanaCsvImporter::new(file.path(), None).with_status_source(StatusSource::Completion);
    let result = importer.import().await.unwrap();
    assert_eq!(result.issues[0].status, IssueStatus::Todo);
    assert_eq!(result.issues[1].status, IssueStatus::Done);
}

#[tokio::test]
async fn missing_file_propagates_read_error() {
    let importer = AsanaCsvImporter::new("/no/such/export.csv", None);
    let err = importer.import().await.unwrap_err();
    assert!(matches!(err, ImportError::FileRead { .. }));
}

#[test]
fn asana_importer_identity() {
    let importer = AsanaCsvImporter::new("export.csv", None);
    assert_eq!(importer.name(), "Asana (CSV)");
    assert_eq!(importer.default_team_name(), "Asana");
}

#[tokio::test]
async fn importers_work_behind_trait_objects() {
    struct FixedImporter;

    #[async_trait]
    impl Importer for FixedImporter {
        fn name(&self) -> &str {
            "Fixed"
        }
        fn default_team_name(&self) -> &str {
            "Fixed"
        }
        async fn import(&self) -> Result<ImportResult> {
            Ok(ImportResult::default())
        }
    }

    let file = write_export(EXPORT);
    let importers: Vec<Box<dyn Importer>> = vec![
        Box::new(FixedImporter),
        Box::new(AsanaCsvImporter::new(file.path(), None)),
    ];

    let asana = importers.iter().find(|i| i.name() == "Asana (CSV)").unwrap();
    assert_eq!(asana.import().await.unwrap().issues.len(), 2);
}

#[test]
fn import_result_json_shape() {
    let rows = super::asana_csv::parse_rows(EXPORT, std::path::Path::new("export.csv")).unwrap();
    let result = super::asana_mapper::map_rows(
        &rows,
        &super::asana_mapper::MapOptions::default(),
        |s| s.to_string(),
    );
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["issues"][0]["assigneeId"], "a@x.com");
    assert_eq!(json["issues"][0]["dueDate"], "2024-02-01T00:00:00Z");
    assert_eq!(json["issues"][0]["labels"][1], "urgent");
    assert!(json["issues"][1].get("assigneeId").is_none());
    assert_eq!(json["users"]["a@x.com"]["name"], "a@x.com");
    assert_eq!(json["labels"]["release"]["name"], "release");
}
