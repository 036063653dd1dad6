//! Central role × operation authorization table.
//!
//! Every portal operation has a row here, including the ones the REST
//! surface currently leaves open. Gating another route means calling
//! [`authorize`] with its [`Operation`] in the handler and layering
//! `jwt_auth` on the route, as `/polls/create` does; the table itself is the
//! only place roles are listed.

use crate::models::user_models::{Identity, Role};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreatePoll,
    ListPolls,
    Vote,
    RaiseIssue,
    ListIssues,
    UpdateIssueStatus,
    CommentOnIssue,
    ExportIssues,
}

const EVERYONE: &[Role] = &[Role::Employee, Role::Admin, Role::SuperAdmin];
const MANAGERS: &[Role] = &[Role::Admin, Role::SuperAdmin];

const POLICY: &[(Operation, &[Role])] = &[
    (Operation::CreatePoll, MANAGERS),
    (Operation::ListPolls, EVERYONE),
    (Operation::Vote, EVERYONE),
    (Operation::RaiseIssue, EVERYONE),
    (Operation::ListIssues, EVERYONE),
    (Operation::UpdateIssueStatus, EVERYONE),
    (Operation::CommentOnIssue, EVERYONE),
    (Operation::ExportIssues, EVERYONE),
];

pub fn allows(role: Role, operation: Operation) -> bool {
    POLICY
        .iter()
        .find(|(op, _)| *op == operation)
        .is_some_and(|(_, roles)| roles.contains(&role))
}

pub fn authorize(identity: &Identity, operation: Operation) -> AppResult<()> {
    if allows(identity.role, operation) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role {} is not allowed to perform this action",
            identity.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> Identity {
        Identity {
            user_id: "u1".to_string(),
            role,
            name: "Sam".to_string(),
        }
    }

    #[test]
    fn only_managers_create_polls() {
        assert!(!allows(Role::Employee, Operation::CreatePoll));
        assert!(allows(Role::Admin, Operation::CreatePoll));
        assert!(allows(Role::SuperAdmin, Operation::CreatePoll));
    }

    #[test]
    fn everyone_votes_and_raises_issues() {
        for role in EVERYONE {
            assert!(allows(*role, Operation::Vote));
            assert!(allows(*role, Operation::RaiseIssue));
            assert!(allows(*role, Operation::CommentOnIssue));
        }
    }

    #[test]
    fn authorize_maps_denial_to_forbidden() {
        assert!(authorize(&caller(Role::Admin), Operation::CreatePoll).is_ok());
        assert!(matches!(
            authorize(&caller(Role::Employee), Operation::CreatePoll),
            Err(AppError::Forbidden(_))
        ));
    }
}
