//! Persistence ports for the poll and issue aggregates.
//!
//! Every mutating method is a single-document atomic update in the backing
//! store, so per-aggregate invariants hold under concurrent requests without
//! any read-modify-write in the services.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;

use crate::models::{
    issue_models::{Comment, Issue, IssueFilter, IssueStatus},
    poll_models::Poll,
};
use crate::utils::error::AppResult;

#[async_trait]
pub trait PollStore: Send + Sync {
    async fn insert_poll(&self, poll: &Poll) -> AppResult<()>;

    /// All polls in insertion order.
    async fn list_polls(&self) -> AppResult<Vec<Poll>>;

    async fn find_poll(&self, id: ObjectId) -> AppResult<Option<Poll>>;

    /// Atomically removes `user_id` from every option of the poll and adds it
    /// to `option_index`. `None` when no poll with that id has such an option.
    async fn record_vote(
        &self,
        id: ObjectId,
        option_index: usize,
        user_id: &str,
    ) -> AppResult<Option<Poll>>;
}

#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn insert_issue(&self, issue: &Issue) -> AppResult<()>;

    /// Issues matching `filter`, newest-created first.
    async fn list_issues(&self, filter: &IssueFilter) -> AppResult<Vec<Issue>>;

    async fn find_issue(&self, id: ObjectId) -> AppResult<Option<Issue>>;

    async fn set_status(&self, id: ObjectId, status: IssueStatus) -> AppResult<Option<Issue>>;

    /// Appends to the comment log; `None` when the issue does not exist.
    async fn push_comment(&self, id: ObjectId, comment: &Comment) -> AppResult<Option<Issue>>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Display names for the given user ids. Unknown ids are absent from the map.
    async fn display_names(&self, ids: &[String]) -> AppResult<HashMap<String, String>>;
}
