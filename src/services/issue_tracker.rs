use mongodb::bson;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::db::store::{IssueStore, UserDirectory};
use crate::models::{
    issue_models::{Comment, CommentView, Issue, IssueFilter, IssueStatus, IssueView, Priority},
    to_chrono,
    user_models::UserRef,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::export::{self, ExportFormat, ExportRow};
use crate::utils::{parse_object_id, required_text};

const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub raised_by: String,
}

/// Builds read models with every user id swapped for `{id, name}`.
async fn resolve(users: &dyn UserDirectory, issues: Vec<Issue>) -> AppResult<Vec<IssueView>> {
    let mut ids: Vec<String> = issues
        .iter()
        .flat_map(|issue| {
            std::iter::once(issue.raised_by.clone())
                .chain(issue.comments.iter().map(|comment| comment.created_by.clone()))
        })
        .collect();
    ids.sort();
    ids.dedup();

    let names = users.display_names(&ids).await?;
    Ok(issues.into_iter().map(|issue| view_of(issue, &names)).collect())
}

fn user_ref(id: String, names: &HashMap<String, String>) -> UserRef {
    let name = names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_USER.to_string());
    UserRef { id, name }
}

fn view_of(issue: Issue, names: &HashMap<String, String>) -> IssueView {
    IssueView {
        id: issue.id.to_hex(),
        title: issue.title,
        description: issue.description,
        priority: issue.priority,
        status: issue.status,
        raised_by: user_ref(issue.raised_by, names),
        comments: issue
            .comments
            .into_iter()
            .map(|comment| CommentView {
                text: comment.text,
                created_by: user_ref(comment.created_by, names),
                created_at: to_chrono(comment.created_at),
            })
            .collect(),
        created_at: to_chrono(issue.created_at),
    }
}

async fn resolve_one(users: &dyn UserDirectory, issue: Issue) -> AppResult<IssueView> {
    resolve(users, vec![issue])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Issue vanished during name resolution".to_string()))
}

fn issue_not_found() -> AppError {
    AppError::NotFound("Issue not found".to_string())
}

/// New issues always start Pending.
pub async fn raise_issue(
    store: &dyn IssueStore,
    users: &dyn UserDirectory,
    new_issue: NewIssue,
) -> AppResult<IssueView> {
    let issue = Issue {
        id: bson::oid::ObjectId::new(),
        title: required_text(&new_issue.title, "title")?,
        description: new_issue.description.trim().to_string(),
        priority: new_issue.priority,
        status: IssueStatus::Pending,
        raised_by: required_text(&new_issue.raised_by, "raisedBy")?,
        comments: Vec::new(),
        created_at: bson::DateTime::now(),
    };

    store.insert_issue(&issue).await?;
    info!(issue_id = %issue.id, priority = %issue.priority, "issue raised");

    resolve_one(users, issue).await
}

pub async fn list_issues(
    store: &dyn IssueStore,
    users: &dyn UserDirectory,
    filter: IssueFilter,
) -> AppResult<Vec<IssueView>> {
    let issues = store.list_issues(&filter).await?;
    debug!(count = issues.len(), ?filter, "listed issues");
    resolve(users, issues).await
}

pub async fn get_issue(
    store: &dyn IssueStore,
    users: &dyn UserDirectory,
    issue_id: &str,
) -> AppResult<IssueView> {
    let id = parse_object_id(issue_id, "issue")?;
    let issue = store.find_issue(id).await?.ok_or_else(issue_not_found)?;
    resolve_one(users, issue).await
}

pub async fn update_status(
    store: &dyn IssueStore,
    users: &dyn UserDirectory,
    issue_id: &str,
    status: IssueStatus,
) -> AppResult<IssueView> {
    let id = parse_object_id(issue_id, "issue")?;
    let issue = store.set_status(id, status).await?.ok_or_else(issue_not_found)?;

    info!(issue_id = %issue.id, status = %status, "issue status updated");
    resolve_one(users, issue).await
}

pub async fn add_comment(
    store: &dyn IssueStore,
    users: &dyn UserDirectory,
    issue_id: &str,
    text: &str,
    created_by: &str,
) -> AppResult<IssueView> {
    let id = parse_object_id(issue_id, "issue")?;
    let comment = Comment {
        text: required_text(text, "text")?,
        created_by: required_text(created_by, "createdBy")?,
        created_at: bson::DateTime::now(),
    };

    let issue = store.push_comment(id, &comment).await?.ok_or_else(issue_not_found)?;

    info!(issue_id = %issue.id, comments = issue.comments.len(), "comment added");
    resolve_one(users, issue).await
}

/// Renders every issue, newest first, fully in memory.
pub async fn export_snapshot(
    store: &dyn IssueStore,
    users: &dyn UserDirectory,
    format: ExportFormat,
) -> AppResult<Vec<u8>> {
    let issues = list_issues(store, users, IssueFilter::default()).await?;
    let rows: Vec<ExportRow> = issues.iter().map(ExportRow::from).collect();

    let bytes = tokio::task::spawn_blocking(move || export::render(format, &rows))
        .await
        .map_err(|e| AppError::ExportError(format!("Export task failed: {}", e)))??;

    info!(?format, issues = issues.len(), bytes = bytes.len(), "issues exported");
    Ok(bytes)
}
