use axum::response::Json;
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::services::login_service::{self, LoginRequest};

/// POST /login - authenticate credentials and receive a bearer token
///
/// A missing or non-JSON body is treated as an empty payload so the service
/// reports "All fields must be filled" instead of a framework-level 400.
pub async fn login_post(payload: Option<Json<LoginRequest>>) -> Result<Json<Value>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let token = login_service::login(DatabaseManager::pool(), payload).await?;

    Ok(Json(json!({ "token": token })))
}
