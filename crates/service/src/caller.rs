//! Explicit identity of whoever invokes a service operation.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Caller {
    #[default]
    Anonymous,
    User { id: Uuid, role: Role },
}

impl Caller {
    pub fn member(id: Uuid) -> Self { Caller::User { id, role: Role::Member } }

    pub fn admin(id: Uuid) -> Self { Caller::User { id, role: Role::Admin } }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Caller::Anonymous => None,
            Caller::User { id, .. } => Some(*id),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Caller::Anonymous => None,
            Caller::User { role, .. } => Some(*role),
        }
    }

    pub fn is_admin(&self) -> bool { self.role() == Some(Role::Admin) }

    /// Authenticated user id, or `Unauthorized` for anonymous callers.
    pub fn require_user(&self) -> Result<Uuid, crate::errors::ServiceError> {
        self.user_id().ok_or(crate::errors::ServiceError::Unauthorized)
    }
}
