pub mod issue_tracker;
pub mod poll_engine;
