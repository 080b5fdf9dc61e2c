use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

use crate::auth::{decode_token, Claims};
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::types::{RecordId, Role};

/// Verified identity attached to the request after token validation
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: RecordId,
    pub role: Role,
}

/// Token-validation middleware guarding admin registration and all recipe
/// mutation routes.
///
/// The raw `authorization` header value is the token; there is no "Bearer "
/// prefix in this API's contract. Decoded claims are then re-resolved against
/// the live users table: a signature alone is not trusted, since role or
/// email may have changed since issuance. An unknown account and a
/// claim-vs-record mismatch are both reported as "jwt malformed" so the
/// response never reveals whether the claimed account exists.
pub async fn auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("missing auth token"))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("jwt malformed"))?;

    let claims = decode_token(token)?;

    let user = User::find_by_email(DatabaseManager::pool(), &claims.email)
        .await?
        .ok_or_else(claim_mismatch)?;

    if !claims_match_record(&claims, &user) {
        return Err(claim_mismatch());
    }

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Exact-match re-validation of token claims against the current record.
fn claims_match_record(claims: &Claims, user: &User) -> bool {
    claims.email == user.email && claims.role == user.role && claims.id == user.id.as_str()
}

fn claim_mismatch() -> ApiError {
    ApiError::unauthorized("jwt malformed")
}
