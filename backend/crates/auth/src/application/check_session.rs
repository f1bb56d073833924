//! Check Session Use Case
//!
//! Resolves the caller identity from a session token. Every request goes
//! through this before any authorization decision; a failure here means
//! "anonymous", which the middleware layer represents as `None`.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token;
use crate::domain::entity::{identity::Identity, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> CheckSessionUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Resolve the full user behind a session token.
    ///
    /// The session stores only the user reference; the user row is
    /// re-read here so role changes (e.g. an admin demotion) take effect
    /// on the next request, not at session expiry.
    pub async fn resolve_user(&self, session_token: &str) -> AuthResult<User> {
        let session_id =
            token::parse_session_token(&self.config.session_secret, session_token)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let user = self
            .user_repo
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        // Update last activity in the background; a failure here must not
        // fail the request
        let mut session = session;
        session.touch();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update_activity(&session).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(user)
    }

    /// Resolve just the caller identity
    pub async fn resolve_identity(&self, session_token: &str) -> AuthResult<Identity> {
        self.resolve_user(session_token)
            .await
            .map(|user| Identity::from(&user))
    }
}
