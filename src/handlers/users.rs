use axum::{extract::Extension, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::user_service::{self, RegisterRequest};

/// POST /users - register a regular account
pub async fn register_user_post(
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let user = user_service::register_user(DatabaseManager::pool(), payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// POST /users/admin - register an admin account (admin token required)
pub async fn register_admin_post(
    Extension(identity): Extension<AuthUser>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let user =
        user_service::register_admin(DatabaseManager::pool(), identity.role, payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}
