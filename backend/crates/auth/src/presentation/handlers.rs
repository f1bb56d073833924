//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use platform::cookie::CookieConfig;
use platform::encode::percent_encode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, RegisterInput, RegisterUseCase, SignInInput, SignInUseCase,
    SignOutUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    EditProfileRequest, JoinRequest, JoinResponse, LoginRequest, LoginResponse, ProfileResponse,
    SessionStatusResponse, SuccessResponse,
};
use crate::presentation::middleware::{CurrentIdentity, wants_json};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Default page after login when no returnTo was carried
const DEFAULT_AFTER_LOGIN: &str = "/product/list";

// ============================================================================
// Join (registration)
// ============================================================================

/// POST /auth/join
pub async fn join<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Form(req): Form<JoinRequest>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone());

    // Keep the submitted email around for the failure redirect
    let submitted_email = req.email.clone();

    let input = RegisterInput {
        email: req.email,
        password: req.password,
        password_confirm: req.password_confirm,
        display_name: req.display_name,
        campus: req.campus,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            if wants_json(&headers) {
                Json(JoinResponse {
                    public_id: output.public_id,
                })
                .into_response()
            } else {
                Redirect::to("/auth/login?joined=1").into_response()
            }
        }
        Err(err) => {
            if wants_json(&headers) {
                err.into_response()
            } else {
                // Re-present the form with the error and the email preserved
                let message = err.to_app_error().message().to_string();
                Redirect::to(&format!(
                    "/auth/login?join=1&error={}&email={}",
                    percent_encode(&message),
                    percent_encode(&submitted_email)
                ))
                .into_response()
            }
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Form(req): Form<LoginRequest>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let submitted_email = req.email.clone();
    let return_to = sanitize_return_to(req.return_to.as_deref());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            let cookie = build_session_cookie(&state.config, &output.session_token);

            if wants_json(&headers) {
                (
                    StatusCode::OK,
                    [(header::SET_COOKIE, cookie)],
                    Json(LoginResponse {
                        public_id: output.public_id,
                        display_name: output.display_name,
                        is_admin: output.is_admin,
                    }),
                )
                    .into_response()
            } else {
                let target = return_to.unwrap_or_else(|| DEFAULT_AFTER_LOGIN.to_string());
                (
                    [(header::SET_COOKIE, cookie)],
                    Redirect::to(&target),
                )
                    .into_response()
            }
        }
        Err(err) => {
            if wants_json(&headers) {
                err.into_response()
            } else {
                let message = err.to_app_error().message().to_string();
                Redirect::to(&format!(
                    "/auth/login?error={}&email={}",
                    percent_encode(&message),
                    percent_encode(&submitted_email)
                ))
                .into_response()
            }
        }
    }
}

/// A returnTo is honored only if it is a local path outside /auth
fn sanitize_return_to(return_to: Option<&str>) -> Option<String> {
    let return_to = return_to?;
    if return_to.starts_with('/')
        && !return_to.starts_with("//")
        && !return_to.starts_with("/auth")
    {
        Some(return_to.to_string())
    } else {
        None
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /auth/logout
///
/// The session row is destroyed server-side before the cookie is cleared;
/// the clear happens regardless of how the destroy went.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    if let Some(token) = token {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(err) = use_case.execute(&token).await {
            tracing::warn!(error = %err, "Logout session destroy failed");
        }
    }

    let cookie = build_clear_cookie(&state.config);

    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /auth/status
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CheckSessionUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let user = match token {
        Some(token) => use_case.resolve_user(&token).await.ok(),
        None => None,
    };

    match user {
        Some(user) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            public_id: Some(user.public_id.to_string()),
            display_name: Some(user.display_name.as_str().to_string()),
            is_admin: Some(user.is_admin),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            public_id: None,
            display_name: None,
            is_admin: None,
        })),
    }
}

// ============================================================================
// Profile
// ============================================================================

/// GET /user/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let identity = current.0.ok_or(AuthError::Unauthenticated)?;

    // Qualified call - both repository traits expose a find_by_id
    let user = UserRepository::find_by_id(state.repo.as_ref(), &identity.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(ProfileResponse {
        public_id: user.public_id.to_string(),
        email: user.email.as_str().to_string(),
        display_name: user.display_name.as_str().to_string(),
        campus: user.campus,
        profile_image_path: user.profile_image_path,
        is_admin: user.is_admin,
        created_at_ms: user.created_at.timestamp_millis(),
    }))
}

/// POST /user/edit
pub async fn edit_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentIdentity>,
    headers: HeaderMap,
    Form(req): Form<EditProfileRequest>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let input = UpdateProfileInput {
        display_name: req.display_name,
        campus: req.campus,
    };

    match use_case.execute(current.0.as_ref(), input).await {
        Ok(()) => {
            if wants_json(&headers) {
                Json(SuccessResponse { success: true }).into_response()
            } else {
                Redirect::to("/user/profile?success=1").into_response()
            }
        }
        Err(err) => {
            if wants_json(&headers) {
                err.into_response()
            } else {
                let message = err.to_app_error().message().to_string();
                Redirect::to(&format!(
                    "/user/profile?edit=true&error={}",
                    percent_encode(&message)
                ))
                .into_response()
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn session_cookie_config(config: &AuthConfig, max_age_secs: Option<i64>) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs,
    }
}

fn build_session_cookie(config: &AuthConfig, token: &str) -> String {
    session_cookie_config(config, Some(config.session_ttl.as_secs() as i64))
        .build_set_cookie(token)
}

fn build_clear_cookie(config: &AuthConfig) -> String {
    session_cookie_config(config, None).build_delete_cookie()
}
