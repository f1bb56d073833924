//! Update Profile Use Case
//!
//! Self-service profile edit. The set of updatable fields is enumerated
//! by [`ProfileChanges`]; there is no dynamic "update whatever keys were
//! posted" path.

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::entity::user::ProfileChanges;
use crate::domain::guard::{self, Capability};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::display_name::DisplayName;
use crate::error::{AuthError, AuthResult};

/// Update profile input
pub struct UpdateProfileInput {
    pub display_name: String,
    pub campus: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        input: UpdateProfileInput,
    ) -> AuthResult<()> {
        let identity = guard::authorize(identity, Capability::Authenticated)?;

        let display_name = DisplayName::new(&input.display_name)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        // An empty campus clears the field
        let campus = input
            .campus
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let changes = ProfileChanges {
            display_name: Some(display_name),
            campus: Some(campus),
            profile_image_path: None,
        };

        self.user_repo
            .update_profile(&identity.user_id, &changes)
            .await?;

        tracing::info!(user_id = %identity.user_id, "Profile updated");

        Ok(())
    }
}
