use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{issue_token, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::services::validate::is_valid_email;

/// Minimum accepted password length at login
const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validate credentials and issue a bearer token.
///
/// An omitted field and a wrong value are distinct error classes: the former
/// is "All fields must be filled", everything after that point (malformed
/// email, short password, unknown account, hash mismatch) collapses into
/// "Incorrect username or password" so the response never reveals which
/// factor failed.
pub async fn login(pool: &PgPool, payload: LoginRequest) -> Result<String, ApiError> {
    let (email, password) = check_login_data(payload)?;

    let user = User::find_by_email(pool, &email)
        .await?
        .ok_or_else(incorrect_credentials)?;

    let matches =
        bcrypt::verify(&password, &user.password).map_err(|_| incorrect_credentials())?;
    if !matches {
        return Err(incorrect_credentials());
    }

    let claims = Claims::new(email, user.role, &user.id);
    issue_token(&claims)
}

fn check_login_data(payload: LoginRequest) -> Result<(String, String), ApiError> {
    let email = payload.email.ok_or_else(missing_fields)?;
    let password = payload.password.ok_or_else(missing_fields)?;

    if password.chars().count() < MIN_PASSWORD_LEN || !is_valid_email(&email) {
        return Err(incorrect_credentials());
    }

    Ok((email, password))
}

fn missing_fields() -> ApiError {
    ApiError::unauthorized("All fields must be filled")
}

fn incorrect_credentials() -> ApiError {
    ApiError::unauthorized("Incorrect username or password")
}
