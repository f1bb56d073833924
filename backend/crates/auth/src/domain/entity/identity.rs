//! Identity
//!
//! The resolved caller: who is making this request, and are they an
//! admin. Threaded explicitly as an argument into every use case instead
//! of being read from ambient request state, so authorization is testable
//! without a transport layer. Anonymous callers are `Option::None`, never
//! a sentinel value.

use crate::domain::value_object::user_id::UserId;

use super::user::User;

/// Resolved caller identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_copy() {
        let identity = Identity {
            user_id: UserId::new(),
            is_admin: false,
        };
        let copied = identity;
        assert_eq!(copied, identity);
    }
}
