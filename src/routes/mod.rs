pub mod issue_routes;
pub mod poll_routes;
