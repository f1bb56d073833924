//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub display_name: String,
    pub campus: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub public_id: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Validate and create the account.
    ///
    /// Every cheap check runs before the first database round-trip, so a
    /// malformed submission never costs a query and the error messages
    /// stay uniform regardless of what exists in storage.
    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Required fields
        if input.email.trim().is_empty()
            || input.password.is_empty()
            || input.password_confirm.is_empty()
            || input.display_name.trim().is_empty()
        {
            return Err(AuthError::Validation(
                "All required fields must be filled in".to_string(),
            ));
        }

        // Email shape
        let email = Email::new(&input.email)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // Password confirmation
        if input.password != input.password_confirm {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        // Password policy (12 characters minimum)
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        let display_name = DisplayName::new(&input.display_name)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // Duplicate email - first database round-trip
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password)
            .map_err(|e| AuthError::Internal(e.message().to_string()))?;

        let campus = input
            .campus
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let user = User::new(email, password_hash, display_name, campus);

        self.user_repo.create(&user).await?;

        tracing::info!(
            public_id = %user.public_id,
            "User registered"
        );

        Ok(RegisterOutput {
            public_id: user.public_id.to_string(),
        })
    }
}
