//! Bearer-token authentication and password hashing.
//!
//! Tokens are HS256 JWTs carrying the staff id, username and home hospital.
//! Verification yields the [`StaffContext`] that is passed explicitly into the
//! search operation; nothing here is read from ambient request state.

use chrono::Utc;
use hmw_core::StaffContext;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// `iss` claim stamped into every issued token.
pub const TOKEN_ISSUER: &str = "hospital-middleware";

/// Issued tokens expire after 72 hours.
const TOKEN_TTL_HOURS: i64 = 72;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingCredentials,
    #[error("invalid token format")]
    MalformedCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("failed to hash password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    staff_id: i32,
    username: String,
    hospital: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Sign a token for the given staff identity.
pub fn issue_token(secret: &str, staff: &StaffContext) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        staff_id: staff.staff_id,
        username: staff.username.clone(),
        hospital: staff.hospital.clone(),
        iss: TOKEN_ISSUER.to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verify a token and reconstruct the staff identity it carries.
///
/// # Errors
/// Any signature, expiry or issuer mismatch surfaces as
/// [`AuthError::InvalidToken`]; callers treat every variant as unauthorized.
pub fn verify_token(secret: &str, token: &str) -> Result<StaffContext, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(StaffContext {
        hospital: data.claims.hospital,
        staff_id: data.claims.staff_id,
        username: data.claims.username,
    })
}

/// Extract the bearer token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredentials)?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedCredentials)
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Check a password against a stored hash; any error counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> StaffContext {
        StaffContext {
            hospital: "Hospital A".into(),
            staff_id: 7,
            username: "staff1".into(),
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let token = issue_token("secret", &staff()).expect("issue");
        let verified = verify_token("secret", &token).expect("verify");
        assert_eq!(verified, staff());
    }

    #[test]
    fn rejects_token_signed_with_another_secret() {
        let token = issue_token("secret", &staff()).expect("issue");
        let err = verify_token("other-secret", &token).expect_err("must reject");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn rejects_garbage_token() {
        let err = verify_token("secret", "not.a.token").expect_err("must reject");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn bearer_header_parsing() {
        assert!(matches!(
            bearer_token(None),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(Some("Token abc")),
            Err(AuthError::MalformedCredentials)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(AuthError::MalformedCredentials)
        ));
        assert_eq!(bearer_token(Some("Bearer abc")).expect("token"), "abc");
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = bcrypt::hash("hunter2", 4).expect("hash");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
