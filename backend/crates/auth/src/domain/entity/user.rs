//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, user_id::UserId,
    user_password::UserPassword,
};

/// User entity
///
/// One row per account. The password hash rides along so the entity can be
/// verified against, but it is redacted in Debug output and never
/// serialized into a response.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe)
    pub public_id: PublicId,
    /// Login email (unique, lowercased)
    pub email: Email,
    /// Argon2id password hash
    pub password_hash: UserPassword,
    /// Name shown on listings and comments
    pub display_name: DisplayName,
    /// Campus the user belongs to
    pub campus: Option<String>,
    /// Path to the uploaded profile image (storage is external)
    pub profile_image_path: Option<String>,
    /// Admin flag
    pub is_admin: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user
    pub fn new(
        email: Email,
        password_hash: UserPassword,
        display_name: DisplayName,
        campus: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            email,
            password_hash,
            display_name,
            campus,
            profile_image_path: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Explicit partial update for the self-service profile edit
///
/// Every updatable field is enumerated here; `None` means "leave as is".
/// For nullable columns the inner `Option` carries the new value, so
/// `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<DisplayName>,
    pub campus: Option<Option<String>>,
    pub profile_image_path: Option<Option<String>>,
}

impl ProfileChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.campus.is_none()
            && self.profile_image_path.is_none()
    }

    /// Apply the changes to a user entity (used by in-memory stores)
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.display_name {
            user.display_name = name.clone();
        }
        if let Some(campus) = &self.campus {
            user.campus = campus.clone();
        }
        if let Some(path) = &self.profile_image_path {
            user.profile_image_path = path.clone();
        }
        user.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn sample_user() -> User {
        let raw = RawPassword::new("sample-password!".to_string()).unwrap();
        User::new(
            Email::new("alice@example.com").unwrap(),
            UserPassword::from_raw(&raw).unwrap(),
            DisplayName::new("Alice").unwrap(),
            Some("North".to_string()),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();
        assert!(!user.is_admin);
        assert!(user.profile_image_path.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_profile_changes_apply() {
        let mut user = sample_user();
        let changes = ProfileChanges {
            display_name: Some(DisplayName::new("Alicia").unwrap()),
            campus: Some(None),
            profile_image_path: None,
        };
        changes.apply(&mut user);

        assert_eq!(user.display_name.as_str(), "Alicia");
        assert!(user.campus.is_none());
    }

    #[test]
    fn test_profile_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());

        let changes = ProfileChanges {
            campus: Some(Some("South".to_string())),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
