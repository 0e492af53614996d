//! Role-based permission policy.
//!
//! Single authoritative allow/deny table for every feeder and account
//! operation. Handlers call [`authorize`] before touching the registry or
//! ledger; record-level scoping (a staff member may only touch feeders
//! assigned to them, a user only sees their mapped feeder) is enforced by
//! the repository queries themselves.

use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::user::Role;

/// Operations subject to role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Role-scoped feeder listing. Allowed for every role; the scope
    /// (all / assigned / mapped) differs per role.
    ListFeeders,
    /// Create a new feeder.
    CreateFeeder,
    /// Delete a feeder and everything referencing it.
    DeleteFeeder,
    /// Report a status change for an assigned feeder.
    UpdateFeederStatus,
    /// Read the update history of a feeder.
    ViewFeederHistory,
    /// Assign a staff member to a feeder.
    AssignStaff,
    /// Map an end user to a feeder.
    AssignUser,
    /// List the staff directory.
    ListStaff,
    /// Change another user's role.
    SetRole,
}

impl Operation {
    fn describe(self) -> &'static str {
        match self {
            Self::ListFeeders => "view feeders",
            Self::CreateFeeder => "create feeders",
            Self::DeleteFeeder => "delete feeders",
            Self::UpdateFeederStatus => "update feeder status",
            Self::ViewFeederHistory => "view feeder history",
            Self::AssignStaff => "assign staff to feeders",
            Self::AssignUser => "assign users to feeders",
            Self::ListStaff => "view the staff list",
            Self::SetRole => "change user roles",
        }
    }
}

/// Check whether `role` may perform `op`.
///
/// Denial is always `DomainError::Forbidden` with a role-specific message
/// and never leaks any record data.
pub fn authorize(role: Role, op: Operation) -> DomainResult<()> {
    let allowed = match op {
        Operation::ListFeeders => true,
        Operation::CreateFeeder
        | Operation::DeleteFeeder
        | Operation::AssignStaff
        | Operation::ViewFeederHistory
        | Operation::ListStaff
        | Operation::SetRole => role == Role::Admin,
        Operation::UpdateFeederStatus => role == Role::Staff,
        Operation::AssignUser => matches!(role, Role::Admin | Role::Staff),
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "Role '{}' is not allowed to {}",
            role.as_str(),
            op.describe()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_may_list_feeders() {
        for role in [Role::Admin, Role::Staff, Role::User] {
            assert!(authorize(role, Operation::ListFeeders).is_ok());
        }
    }

    #[test]
    fn test_admin_only_operations() {
        for op in [
            Operation::CreateFeeder,
            Operation::DeleteFeeder,
            Operation::AssignStaff,
            Operation::ViewFeederHistory,
            Operation::ListStaff,
            Operation::SetRole,
        ] {
            assert!(authorize(Role::Admin, op).is_ok());
            assert!(authorize(Role::Staff, op).is_err());
            assert!(authorize(Role::User, op).is_err());
        }
    }

    #[test]
    fn test_status_updates_are_staff_only() {
        assert!(authorize(Role::Staff, Operation::UpdateFeederStatus).is_ok());
        assert!(authorize(Role::Admin, Operation::UpdateFeederStatus).is_err());
        assert!(authorize(Role::User, Operation::UpdateFeederStatus).is_err());
    }

    #[test]
    fn test_user_assignment_allowed_for_admin_and_staff() {
        assert!(authorize(Role::Admin, Operation::AssignUser).is_ok());
        assert!(authorize(Role::Staff, Operation::AssignUser).is_ok());
        assert!(authorize(Role::User, Operation::AssignUser).is_err());
    }

    #[test]
    fn test_denial_is_forbidden_with_role_in_message() {
        let err = authorize(Role::User, Operation::CreateFeeder).unwrap_err();
        match err {
            DomainError::Forbidden(msg) => assert!(msg.contains("user")),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }
}
