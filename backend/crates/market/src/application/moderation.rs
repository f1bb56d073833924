//! Moderation Use Cases
//!
//! Admin-only removal of users. Listing removal reuses
//! [`crate::application::DeleteProductUseCase`], whose guard already
//! admits administrators.

use std::sync::Arc;

use auth::{Capability, Identity, authorize};

use crate::domain::repository::ModerationRepository;
use crate::error::{MarketError, MarketResult};

/// Remove user use case
pub struct RemoveUserUseCase<M>
where
    M: ModerationRepository,
{
    moderation_repo: Arc<M>,
}

impl<M> RemoveUserUseCase<M>
where
    M: ModerationRepository,
{
    pub fn new(moderation_repo: Arc<M>) -> Self {
        Self { moderation_repo }
    }

    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        target_public_id: &str,
    ) -> MarketResult<()> {
        let identity = authorize(identity, Capability::Admin)?;

        let target = self
            .moderation_repo
            .find_user_by_public_id(target_public_id)
            .await?
            .ok_or(MarketError::UserNotFound)?;

        self.moderation_repo
            .delete_user_with_content(&target)
            .await?;

        tracing::info!(
            admin_id = %identity.user_id,
            target_id = %target,
            "User removed by admin"
        );

        Ok(())
    }
}
