//! Auth Middleware
//!
//! Resolves the caller identity once per request and gates protected
//! routes. Browser requests without a session are redirected to the login
//! page with a `returnTo` parameter; AJAX-style requests get a 401 JSON
//! body instead.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::encode::percent_encode;
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Resolved caller identity stored in request extensions
///
/// `None` means anonymous. Handlers read this instead of touching the
/// session machinery themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentIdentity(pub Option<Identity>);

/// Does this request prefer a JSON error over an HTML redirect?
pub fn wants_json(headers: &HeaderMap) -> bool {
    if let Some(requested_with) = headers.get("x-requested-with") {
        if requested_with
            .to_str()
            .is_ok_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
        {
            return true;
        }
    }

    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Middleware that resolves the session into a [`CurrentIdentity`]
///
/// Never rejects: an invalid or absent session just yields an anonymous
/// identity for downstream gates to act on.
pub async fn load_identity<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let identity = match token {
        Some(token) => {
            let use_case = CheckSessionUseCase::new(
                state.repo.clone(),
                state.repo.clone(),
                state.config.clone(),
            );
            use_case.resolve_identity(&token).await.ok()
        }
        None => None,
    };

    req.extensions_mut().insert(CurrentIdentity(identity));

    next.run(req).await
}

/// Middleware that requires an authenticated caller
///
/// Must run after [`load_identity`]. Unauthenticated browser requests are
/// redirected to the login page carrying the originally requested path.
pub async fn require_identity(req: Request<Body>, next: Next) -> Result<Response, Response> {
    let authenticated = req
        .extensions()
        .get::<CurrentIdentity>()
        .is_some_and(|current| current.0.is_some());

    if authenticated {
        return Ok(next.run(req).await);
    }

    if wants_json(req.headers()) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "success": false,
                "message": "Authentication required"
            })),
        )
            .into_response());
    }

    let return_to = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.uri().path());

    Err(Redirect::to(&format!(
        "/auth/login?returnTo={}",
        percent_encode(return_to)
    ))
    .into_response())
}

/// Middleware that requires an administrator
///
/// Must run after [`load_identity`].
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, Response> {
    let identity = req
        .extensions()
        .get::<CurrentIdentity>()
        .and_then(|current| current.0);

    match identity {
        None => Err(AuthError::Unauthenticated.into_response()),
        Some(identity) if !identity.is_admin => Err(AuthError::Forbidden.into_response()),
        Some(_) => Ok(next.run(req).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_wants_json_via_accept() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain"),
        );
        assert!(wants_json(&headers));
    }

    #[test]
    fn test_wants_json_via_requested_with() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-requested-with",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        assert!(wants_json(&headers));
    }

    #[test]
    fn test_browser_request_is_not_json() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(!wants_json(&headers));
    }
}
