use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::User;
use crate::error::ApiError;
use crate::services::validate::is_valid_email;
use crate::types::Role;

/// Minimum accepted name length
const MIN_NAME_LEN: usize = 3;
/// Minimum password length for self-registration
const MIN_USER_PASSWORD_LEN: usize = 6;
/// Minimum password length for admin registration
const MIN_ADMIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register a regular account. Owner of the role=user lifecycle.
pub async fn register_user(pool: &PgPool, payload: RegisterRequest) -> Result<User, ApiError> {
    let (name, email, password) = check_user_data(payload, MIN_USER_PASSWORD_LEN)?;
    let hash = hash_password(&password)?;

    check_email_duplicity(pool, &email).await?;
    let user = User::insert(pool, &name, &email, &hash, Role::User).await?;

    Ok(user)
}

/// Register an admin account. Only an already-authenticated admin may do
/// this; everyone else gets a 403 before any validation happens.
pub async fn register_admin(
    pool: &PgPool,
    acting_role: Role,
    payload: RegisterRequest,
) -> Result<User, ApiError> {
    if acting_role != Role::Admin {
        return Err(ApiError::forbidden("Only admins can register new admins"));
    }

    let (name, email, password) = check_user_data(payload, MIN_ADMIN_PASSWORD_LEN)?;
    let hash = hash_password(&password)?;

    check_email_duplicity(pool, &email).await?;
    let user = User::insert(pool, &name, &email, &hash, Role::Admin).await?;

    Ok(user)
}

/// Shape validation for registration payloads. Missing and malformed fields
/// are the same error class here, unlike login.
fn check_user_data(
    payload: RegisterRequest,
    min_password: usize,
) -> Result<(String, String, String), ApiError> {
    let (name, email, password) = match (payload.name, payload.email, payload.password) {
        (Some(name), Some(email), Some(password)) => (name, email, password),
        _ => return Err(invalid_entries()),
    };

    if name.chars().count() < MIN_NAME_LEN
        || password.chars().count() < min_password
        || !is_valid_email(&email)
    {
        return Err(invalid_entries());
    }

    Ok((name, email, password))
}

async fn check_email_duplicity(pool: &PgPool, email: &str) -> Result<(), ApiError> {
    if User::find_by_email(pool, email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }
    Ok(())
}

fn invalid_entries() -> ApiError {
    ApiError::bad_request("Invalid entries. Try again.")
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })
}
