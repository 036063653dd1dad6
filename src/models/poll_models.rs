use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::models::to_chrono;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub created_by: String,
    pub created_at: bson::DateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollOption {
    pub text: String,
    #[serde(default)]
    pub votes: Vec<String>,
}

impl Poll {
    pub fn new(question: String, options: Vec<String>, created_by: String) -> Self {
        Self {
            id: ObjectId::new(),
            question,
            options: options
                .into_iter()
                .map(|text| PollOption { text, votes: Vec::new() })
                .collect(),
            created_by,
            created_at: bson::DateTime::now(),
        }
    }

    /// Removes `user_id` from every option, then adds it to `option_index`.
    ///
    /// Returns false and leaves the poll untouched when the index is out of range.
    pub fn move_vote(&mut self, option_index: usize, user_id: &str) -> bool {
        if option_index >= self.options.len() {
            return false;
        }

        for option in &mut self.options {
            option.votes.retain(|voter| voter != user_id);
        }
        self.options[option_index].votes.push(user_id.to_string());
        true
    }

    pub fn total_votes(&self) -> usize {
        self.options.iter().map(|option| option.votes.len()).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollView {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub total_votes: usize,
}

impl From<Poll> for PollView {
    fn from(poll: Poll) -> Self {
        let total_votes = poll.total_votes();
        Self {
            id: poll.id.to_hex(),
            question: poll.question,
            options: poll.options,
            created_by: poll.created_by,
            created_at: to_chrono(poll.created_at),
            total_votes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionTally {
    pub text: String,
    pub votes: usize,
    pub percent: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PollTally {
    pub poll_id: String,
    pub question: String,
    pub total_votes: usize,
    pub options: Vec<OptionTally>,
}
