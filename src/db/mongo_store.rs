use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection, Database,
};
use std::collections::HashMap;

use crate::db::store::{IssueStore, PollStore, UserDirectory};
use crate::models::{
    issue_models::{Comment, Issue, IssueFilter, IssueStatus},
    poll_models::Poll,
    user_models::User,
};
use crate::utils::error::AppResult;

const POLLS: &str = "polls";
const ISSUES: &str = "issues";
const USERS: &str = "users";

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn polls(&self) -> Collection<Poll> {
        self.db.collection::<Poll>(POLLS)
    }

    fn issues(&self) -> Collection<Issue> {
        self.db.collection::<Issue>(ISSUES)
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USERS)
    }
}

/// Aggregation-pipeline update that strips `user_id` from every option's
/// vote list and appends it to the option at `option_index`, in one write.
fn move_vote_pipeline(option_index: usize, user_id: &str) -> Vec<Document> {
    let target = option_index as i64;
    vec![doc! {
        "$set": {
            "options": {
                "$map": {
                    "input": { "$range": [0, { "$size": "$options" }] },
                    "as": "i",
                    "in": {
                        "$let": {
                            "vars": { "opt": { "$arrayElemAt": ["$options", "$$i"] } },
                            "in": {
                                "$mergeObjects": [
                                    "$$opt",
                                    {
                                        "votes": {
                                            "$concatArrays": [
                                                {
                                                    "$filter": {
                                                        "input": { "$ifNull": ["$$opt.votes", []] },
                                                        "as": "voter",
                                                        "cond": { "$ne": ["$$voter", { "$literal": user_id }] }
                                                    }
                                                },
                                                {
                                                    "$cond": [
                                                        { "$eq": ["$$i", target] },
                                                        [{ "$literal": user_id }],
                                                        []
                                                    ]
                                                }
                                            ]
                                        }
                                    }
                                ]
                            }
                        }
                    }
                }
            }
        }
    }]
}

fn issue_filter_doc(filter: &IssueFilter) -> AppResult<Document> {
    let mut query = Document::new();
    if let Some(status) = filter.status {
        query.insert("status", bson::to_bson(&status)?);
    }
    if let Some(priority) = filter.priority {
        query.insert("priority", bson::to_bson(&priority)?);
    }
    Ok(query)
}

#[async_trait]
impl PollStore for MongoStore {
    async fn insert_poll(&self, poll: &Poll) -> AppResult<()> {
        self.polls().insert_one(poll).await?;
        Ok(())
    }

    async fn list_polls(&self) -> AppResult<Vec<Poll>> {
        let cursor = self
            .polls()
            .find(doc! {})
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_poll(&self, id: ObjectId) -> AppResult<Option<Poll>> {
        Ok(self.polls().find_one(doc! { "_id": id }).await?)
    }

    async fn record_vote(
        &self,
        id: ObjectId,
        option_index: usize,
        user_id: &str,
    ) -> AppResult<Option<Poll>> {
        let mut filter = doc! { "_id": id };
        filter.insert(format!("options.{}", option_index), doc! { "$exists": true });

        let updated = self
            .polls()
            .find_one_and_update(filter, move_vote_pipeline(option_index, user_id))
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}

#[async_trait]
impl IssueStore for MongoStore {
    async fn insert_issue(&self, issue: &Issue) -> AppResult<()> {
        self.issues().insert_one(issue).await?;
        Ok(())
    }

    async fn list_issues(&self, filter: &IssueFilter) -> AppResult<Vec<Issue>> {
        let cursor = self
            .issues()
            .find(issue_filter_doc(filter)?)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_issue(&self, id: ObjectId) -> AppResult<Option<Issue>> {
        Ok(self.issues().find_one(doc! { "_id": id }).await?)
    }

    async fn set_status(&self, id: ObjectId, status: IssueStatus) -> AppResult<Option<Issue>> {
        let updated = self
            .issues()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": bson::to_bson(&status)? } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn push_comment(&self, id: ObjectId, comment: &Comment) -> AppResult<Option<Issue>> {
        let updated = self
            .issues()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$push": { "comments": bson::to_bson(comment)? } },
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}

#[async_trait]
impl UserDirectory for MongoStore {
    async fn display_names(&self, ids: &[String]) -> AppResult<HashMap<String, String>> {
        // Ids that are not ObjectIds cannot belong to a stored user.
        let object_ids: Vec<ObjectId> = ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();

        if object_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users: Vec<User> = self
            .users()
            .find(doc! { "_id": { "$in": object_ids } })
            .await?
            .try_collect()
            .await?;

        Ok(users
            .into_iter()
            .map(|user| (user.id.to_hex(), user.name))
            .collect())
    }
}
