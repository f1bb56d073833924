//! Authorization Guard
//!
//! Capability checks over a resolved [`Identity`]. Call sites fetch the
//! resource first (missing resource is a 404 before any ownership check),
//! then authorize, then mutate.

use std::fmt;

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::user_id::UserId;

/// A named authorization requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any authenticated caller
    Authenticated,
    /// Caller must be the owner of the resource
    OwnerOf(UserId),
    /// Caller must be an administrator
    Admin,
}

/// Denial reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No identity at all (maps to 401 / login redirect)
    Unauthenticated,
    /// Identity present but not entitled (maps to 403)
    Forbidden,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Unauthenticated => f.write_str("authentication required"),
            Denial::Forbidden => f.write_str("not entitled"),
        }
    }
}

/// Decide whether `identity` satisfies `capability`.
///
/// An anonymous caller is denied `Unauthenticated` for every capability;
/// an authenticated caller failing an ownership or admin check is denied
/// `Forbidden`. Returns the identity on success so call sites can keep
/// using it without re-unwrapping.
pub fn authorize(
    identity: Option<&Identity>,
    capability: Capability,
) -> Result<&Identity, Denial> {
    let identity = identity.ok_or(Denial::Unauthenticated)?;

    match capability {
        Capability::Authenticated => Ok(identity),
        Capability::OwnerOf(owner) => {
            if identity.user_id == owner {
                Ok(identity)
            } else {
                Err(Denial::Forbidden)
            }
        }
        Capability::Admin => {
            if identity.is_admin {
                Ok(identity)
            } else {
                Err(Denial::Forbidden)
            }
        }
    }
}

/// Owner-or-admin composition used by moderation paths (e.g. a seller or
/// an administrator may delete a listing).
pub fn authorize_owner_or_admin(
    identity: Option<&Identity>,
    owner: UserId,
) -> Result<&Identity, Denial> {
    authorize(identity, Capability::OwnerOf(owner))
        .or_else(|denial| match denial {
            Denial::Unauthenticated => Err(Denial::Unauthenticated),
            Denial::Forbidden => authorize(identity, Capability::Admin),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Identity {
        Identity {
            user_id: UserId::new(),
            is_admin: false,
        }
    }

    fn admin() -> Identity {
        Identity {
            user_id: UserId::new(),
            is_admin: true,
        }
    }

    #[test]
    fn test_anonymous_denied_every_capability() {
        let owner = UserId::new();
        for capability in [
            Capability::Authenticated,
            Capability::OwnerOf(owner),
            Capability::Admin,
        ] {
            assert_eq!(
                authorize(None, capability).unwrap_err(),
                Denial::Unauthenticated
            );
        }
    }

    #[test]
    fn test_authenticated_allows_any_identity() {
        let identity = member();
        assert!(authorize(Some(&identity), Capability::Authenticated).is_ok());
    }

    #[test]
    fn test_owner_check() {
        let identity = member();
        assert!(authorize(Some(&identity), Capability::OwnerOf(identity.user_id)).is_ok());

        let other = UserId::new();
        assert_eq!(
            authorize(Some(&identity), Capability::OwnerOf(other)).unwrap_err(),
            Denial::Forbidden
        );
    }

    #[test]
    fn test_admin_check() {
        let identity = member();
        assert_eq!(
            authorize(Some(&identity), Capability::Admin).unwrap_err(),
            Denial::Forbidden
        );

        let root = admin();
        assert!(authorize(Some(&root), Capability::Admin).is_ok());
    }

    #[test]
    fn test_admin_does_not_bypass_plain_owner_check() {
        // OwnerOf is strict; moderation paths opt into the composition below
        let root = admin();
        let other = UserId::new();
        assert_eq!(
            authorize(Some(&root), Capability::OwnerOf(other)).unwrap_err(),
            Denial::Forbidden
        );
    }

    #[test]
    fn test_owner_or_admin() {
        let seller = member();
        let root = admin();
        let bystander = member();

        assert!(authorize_owner_or_admin(Some(&seller), seller.user_id).is_ok());
        assert!(authorize_owner_or_admin(Some(&root), seller.user_id).is_ok());
        assert_eq!(
            authorize_owner_or_admin(Some(&bystander), seller.user_id).unwrap_err(),
            Denial::Forbidden
        );
        assert_eq!(
            authorize_owner_or_admin(None, seller.user_id).unwrap_err(),
            Denial::Unauthenticated
        );
    }
}
