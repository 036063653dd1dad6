pub mod health;
pub mod issue_controllers;
pub mod poll_controllers;
