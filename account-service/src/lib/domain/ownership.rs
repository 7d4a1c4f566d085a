//! Ownership checks applied to every mutation of an owned resource.
//!
//! All three checks are pure comparisons of user ids. A rejection carries a
//! human-readable reason naming both ids; callers surface it verbatim.

use crate::domain::principal::models::UserId;
use crate::domain::resource::errors::ResourceError;

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipDecision {
    allowed: bool,
    reason: Option<String>,
}

impl OwnershipDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Turn a rejection into `ResourceError::Unauthorized`.
    pub fn into_result(self) -> Result<(), ResourceError> {
        match self.reason {
            Some(reason) if !self.allowed => Err(ResourceError::Unauthorized(reason)),
            _ => Ok(()),
        }
    }
}

/// A principal may only create records owned by itself.
pub fn authorize_create(principal: UserId, payload_owner: UserId) -> OwnershipDecision {
    if principal == payload_owner {
        OwnershipDecision::allow()
    } else {
        OwnershipDecision::deny(format!(
            "cannot create a record owned by user {}, acting as user {}",
            payload_owner, principal
        ))
    }
}

/// A principal may only update its own records, and may not hand them to someone else.
///
/// The payload owner is checked first.
pub fn authorize_update(
    principal: UserId,
    payload_owner: UserId,
    existing_owner: UserId,
) -> OwnershipDecision {
    if principal != payload_owner {
        OwnershipDecision::deny(format!(
            "cannot reassign ownership to user {}, acting as user {}",
            payload_owner, principal
        ))
    } else if principal != existing_owner {
        OwnershipDecision::deny(format!(
            "record belongs to user {}, not to user {}",
            existing_owner, principal
        ))
    } else {
        OwnershipDecision::allow()
    }
}

/// A principal may only delete its own records.
pub fn authorize_delete(existing_owner: UserId, principal: UserId) -> OwnershipDecision {
    if existing_owner == principal {
        OwnershipDecision::allow()
    } else {
        OwnershipDecision::deny(format!(
            "record belongs to user {}, not to user {}",
            existing_owner, principal
        ))
    }
}
