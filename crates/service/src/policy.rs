//! Per-operation authorization table, evaluated before an operation runs.

use crate::caller::{Caller, Role};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListServices,
    GetService,
    CreateService,
    UpdateService,
    DeleteService,
    ListAccounts,
    GetAccount,
    CreateAccount,
    UpdateAccount,
    DeleteAccount,
    ListScreens,
    GetScreen,
    CreateScreen,
    UpdateScreen,
    ClaimScreen,
    ClaimNextScreen,
    DeleteScreen,
    MyScreens,
}

/// Who an operation is open to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Anyone,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

const POLICY: &[(Operation, Audience)] = &[
    (Operation::ListServices, Audience::Anyone),
    (Operation::GetService, Audience::Anyone),
    (Operation::CreateService, Audience::Admin),
    (Operation::UpdateService, Audience::Admin),
    (Operation::DeleteService, Audience::Admin),
    (Operation::ListAccounts, Audience::Authenticated),
    (Operation::GetAccount, Audience::Authenticated),
    (Operation::CreateAccount, Audience::Authenticated),
    (Operation::UpdateAccount, Audience::Authenticated),
    (Operation::DeleteAccount, Audience::Authenticated),
    (Operation::ListScreens, Audience::Anyone),
    (Operation::GetScreen, Audience::Anyone),
    (Operation::CreateScreen, Audience::Admin),
    (Operation::UpdateScreen, Audience::Authenticated),
    (Operation::ClaimScreen, Audience::Authenticated),
    (Operation::ClaimNextScreen, Audience::Authenticated),
    (Operation::DeleteScreen, Audience::Admin),
    (Operation::MyScreens, Audience::Anyone),
];

impl Operation {
    pub fn audience(self) -> Audience {
        POLICY
            .iter()
            .find(|(op, _)| *op == self)
            .map(|(_, audience)| *audience)
            // Unlisted operations are admin-only.
            .unwrap_or(Audience::Admin)
    }
}

pub fn decide(op: Operation, caller: &Caller) -> Decision {
    let allowed = match (op.audience(), caller.role()) {
        (Audience::Anyone, _) => true,
        (Audience::Authenticated, Some(_)) => true,
        (Audience::Admin, Some(Role::Admin)) => true,
        _ => false,
    };
    if allowed { Decision::Allow } else { Decision::Deny }
}

/// `Unauthorized` for anonymous callers, `Forbidden` for authenticated ones.
pub fn authorize(op: Operation, caller: &Caller) -> Result<(), ServiceError> {
    match decide(op, caller) {
        Decision::Allow => Ok(()),
        Decision::Deny if *caller == Caller::Anonymous => Err(ServiceError::Unauthorized),
        Decision::Deny => Err(ServiceError::Forbidden(format!("{op:?} requires admin role"))),
    }
}
