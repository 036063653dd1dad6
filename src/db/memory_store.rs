use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::store::{IssueStore, PollStore, UserDirectory};
use crate::models::{
    issue_models::{Comment, Issue, IssueFilter, IssueStatus},
    poll_models::Poll,
    user_models::User,
};
use crate::utils::error::AppResult;

/// In-process store used by tests and `STORE=memory` runs.
///
/// Each mutation happens under the write lock, which gives the same
/// per-document atomicity the Mongo adapter gets from single updates.
#[derive(Default)]
pub struct MemoryStore {
    polls: RwLock<Vec<Poll>>,
    issues: RwLock<Vec<Issue>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(
                users
                    .into_iter()
                    .map(|user| (user.id.to_hex(), user))
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn insert_poll(&self, poll: &Poll) -> AppResult<()> {
        self.polls.write().await.push(poll.clone());
        Ok(())
    }

    async fn list_polls(&self) -> AppResult<Vec<Poll>> {
        Ok(self.polls.read().await.clone())
    }

    async fn find_poll(&self, id: ObjectId) -> AppResult<Option<Poll>> {
        Ok(self.polls.read().await.iter().find(|poll| poll.id == id).cloned())
    }

    async fn record_vote(
        &self,
        id: ObjectId,
        option_index: usize,
        user_id: &str,
    ) -> AppResult<Option<Poll>> {
        let mut polls = self.polls.write().await;
        let Some(poll) = polls.iter_mut().find(|poll| poll.id == id) else {
            return Ok(None);
        };

        if !poll.move_vote(option_index, user_id) {
            return Ok(None);
        }
        Ok(Some(poll.clone()))
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn insert_issue(&self, issue: &Issue) -> AppResult<()> {
        self.issues.write().await.push(issue.clone());
        Ok(())
    }

    async fn list_issues(&self, filter: &IssueFilter) -> AppResult<Vec<Issue>> {
        // Reverse insertion order first so equal timestamps still come out newest-first.
        let mut issues: Vec<Issue> = self
            .issues
            .read()
            .await
            .iter()
            .rev()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect();

        issues.sort_by_key(|issue| std::cmp::Reverse(issue.created_at.timestamp_millis()));
        Ok(issues)
    }

    async fn find_issue(&self, id: ObjectId) -> AppResult<Option<Issue>> {
        Ok(self.issues.read().await.iter().find(|issue| issue.id == id).cloned())
    }

    async fn set_status(&self, id: ObjectId, status: IssueStatus) -> AppResult<Option<Issue>> {
        let mut issues = self.issues.write().await;
        Ok(issues.iter_mut().find(|issue| issue.id == id).map(|issue| {
            issue.status = status;
            issue.clone()
        }))
    }

    async fn push_comment(&self, id: ObjectId, comment: &Comment) -> AppResult<Option<Issue>> {
        let mut issues = self.issues.write().await;
        Ok(issues.iter_mut().find(|issue| issue.id == id).map(|issue| {
            issue.comments.push(comment.clone());
            issue.clone()
        }))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn display_names(&self, ids: &[String]) -> AppResult<HashMap<String, String>> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|user| (id.clone(), user.name.clone())))
            .collect())
    }
}
