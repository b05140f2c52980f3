use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// The identity of the caller performing an operation.
///
/// Carries the authenticated user ID and whether the caller holds the
/// admin role. Token verification happens outside this crate; services
/// only consume the resolved identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The authenticated user.
    pub user_id: UserId,

    /// Whether the user holds the admin role.
    pub is_admin: bool,
}

impl Actor {
    /// Creates an actor for a regular user.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// Creates an actor with the admin role.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// Returns true if this actor owns the given user's resources or is an admin.
    pub fn can_act_for(&self, owner: UserId) -> bool {
        self.is_admin || self.user_id == owner
    }
}
