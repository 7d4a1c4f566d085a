use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::principal::models::PrincipalRef;

/// Kind of recorded session activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Login,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "LOGIN",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a session event.
///
/// The id of a login activity is the `jti` of every token issued for that login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub principal: PrincipalRef,
    pub kind: ActivityKind,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// New login activity with a fresh id.
    pub fn login(principal: PrincipalRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            principal,
            kind: ActivityKind::Login,
            created_at: Utc::now(),
        }
    }
}
