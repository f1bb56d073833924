//! Session Token Signing
//!
//! The cookie value is `<session-uuid>.<base64url HMAC-SHA256 signature>`.
//! The signature covers the textual UUID, so a token minted under one
//! secret never parses under another.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Generate a signed session token for a session ID
pub fn sign_session_token(secret: &[u8; 32], session_id: Uuid) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        session_id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Parse and verify a session token, returning the session ID
pub fn parse_session_token(secret: &[u8; 32], token: &str) -> AuthResult<Uuid> {
    let Some((session_id_str, signature_b64)) = token.split_once('.') else {
        return Err(AuthError::SessionInvalid);
    };

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SessionInvalid)?;

    session_id_str
        .parse()
        .map_err(|_| AuthError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_parse_roundtrip() {
        let secret = [7u8; 32];
        let session_id = Uuid::new_v4();

        let token = sign_session_token(&secret, session_id);
        let parsed = parse_session_token(&secret, &token).unwrap();
        assert_eq!(parsed, session_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_session_token(&[7u8; 32], Uuid::new_v4());
        let result = parse_session_token(&[8u8; 32], &token);
        assert!(matches!(result, Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_tampered_session_id_rejected() {
        let secret = [7u8; 32];
        let token = sign_session_token(&secret, Uuid::new_v4());
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), signature);

        let result = parse_session_token(&secret, &forged);
        assert!(matches!(result, Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let secret = [7u8; 32];
        for token in ["", "no-dot", "a.b.c", "not-a-uuid.!!!"] {
            assert!(
                parse_session_token(&secret, token).is_err(),
                "token {:?} should not parse",
                token
            );
        }
    }
}
