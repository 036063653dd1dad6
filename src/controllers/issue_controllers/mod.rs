pub mod add_comment;
pub mod export_issues;
pub mod get_issues;
pub mod models;
pub mod raise_issue;
pub mod update_status;
