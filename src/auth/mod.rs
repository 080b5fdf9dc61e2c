use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;
use crate::types::{RecordId, Role};

/// Claims embedded in a bearer token.
///
/// A token is never a sufficient trust anchor by itself: the middleware
/// re-resolves `email` against the live users table on every request and
/// requires `email`, `role` and `id` to match the current record exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub role: Role,
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(email: String, role: Role, id: &RecordId) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            email,
            role,
            id: id.to_string(),
            iat: now.timestamp(),
            exp,
        }
    }
}

/// Sign a claims payload into an opaque bearer token.
pub fn issue_token(claims: &Claims) -> Result<String, ApiError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(ApiError::internal_server_error("JWT secret not configured"));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| {
        tracing::error!("token signing failed: {}", e);
        ApiError::internal_server_error("Failed to generate token")
    })
}

/// Verify signature and expiry of a bearer token and return its claims.
///
/// Failures surface the underlying verification reason verbatim ("jwt
/// malformed", "invalid signature", "jwt expired") because callers and their
/// tests depend on the exact phrase.
pub fn decode_token(token: &str) -> Result<Claims, ApiError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(ApiError::internal_server_error("JWT secret not configured"));
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| ApiError::unauthorized(verification_message(&e)))?;

    Ok(token_data.claims)
}

/// Map a jsonwebtoken failure onto the phrase this API surfaces for it.
fn verification_message(err: &jsonwebtoken::errors::Error) -> String {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => "jwt malformed".to_string(),
        ErrorKind::InvalidSignature => "invalid signature".to_string(),
        ErrorKind::ExpiredSignature => "jwt expired".to_string(),
        ErrorKind::ImmatureSignature => "jwt not active".to_string(),
        _ => err.to_string(),
    }
}
