//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Join (registration)
// ============================================================================

/// Join form submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    /// Display name field - the form posts it as "name"
    #[serde(rename = "name")]
    pub display_name: String,
    pub campus: Option<String>,
}

/// Join response (AJAX callers)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub public_id: String,
}

// ============================================================================
// Login
// ============================================================================

/// Login form submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Path to return to after login, carried through the login form
    pub return_to: Option<String>,
}

/// Login response (AJAX callers)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub public_id: String,
    pub display_name: String,
    pub is_admin: bool,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub public_id: Option<String>,
    pub display_name: Option<String>,
    pub is_admin: Option<bool>,
}

// ============================================================================
// Profile
// ============================================================================

/// Current user profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub public_id: String,
    pub email: String,
    pub display_name: String,
    pub campus: Option<String>,
    pub profile_image_path: Option<String>,
    pub is_admin: bool,
    pub created_at_ms: i64,
}

/// Profile edit form submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    #[serde(rename = "name")]
    pub display_name: String,
    pub campus: Option<String>,
}

/// Generic success response for mutating AJAX endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_request_field_names() {
        let form = "email=a%40b.com&password=p&passwordConfirm=p&name=Alice&campus=North";
        let req: JoinRequest = serde_urlencoded_from_str(form);
        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.display_name, "Alice");
        assert_eq!(req.campus.as_deref(), Some("North"));
    }

    #[test]
    fn test_login_request_optional_return_to() {
        let req: LoginRequest = serde_urlencoded_from_str("email=a%40b.com&password=p");
        assert!(req.return_to.is_none());

        let req: LoginRequest =
            serde_urlencoded_from_str("email=a%40b.com&password=p&returnTo=%2Fproduct%2Flist");
        assert_eq!(req.return_to.as_deref(), Some("/product/list"));
    }

    #[test]
    fn test_status_response_serialization() {
        let response = SessionStatusResponse {
            authenticated: false,
            public_id: None,
            display_name: None,
            is_admin: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""authenticated":false"#));
        assert!(json.contains("publicId"));
    }

    // Small helper so the tests read like the form posts they model
    fn serde_urlencoded_from_str<T: serde::de::DeserializeOwned>(s: &str) -> T {
        serde_json::from_value(
            serde_json::Value::Object(
                s.split('&')
                    .filter_map(|pair| {
                        let (k, v) = pair.split_once('=')?;
                        Some((
                            k.to_string(),
                            serde_json::Value::String(platform::encode::percent_decode(v)),
                        ))
                    })
                    .collect(),
            ),
        )
        .unwrap()
    }
}
