use std::sync::Arc;

use crate::db::{
    memory_store::MemoryStore,
    store::{IssueStore, PollStore, UserDirectory},
};
use crate::utils::session::SessionKeys;

#[derive(Clone)]
pub struct AppState {
    pub polls: Arc<dyn PollStore>,
    pub issues: Arc<dyn IssueStore>,
    pub users: Arc<dyn UserDirectory>,
    pub sessions: Arc<SessionKeys>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, sessions: SessionKeys) -> Self
    where
        S: PollStore + IssueStore + UserDirectory + 'static,
    {
        Self {
            polls: store.clone(),
            issues: store.clone(),
            users: store,
            sessions: Arc::new(sessions),
        }
    }

    pub fn in_memory(store: MemoryStore, jwt_secret: &str) -> Self {
        Self::new(Arc::new(store), SessionKeys::new(jwt_secret))
    }
}
