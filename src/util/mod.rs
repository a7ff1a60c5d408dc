pub mod jira_markup;
