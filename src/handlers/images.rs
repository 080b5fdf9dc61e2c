use axum::{
    extract::Path,
    http::header,
    response::IntoResponse,
};

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::services::recipe_service;

/// GET /images/:id.jpeg - serve a stored recipe image
pub async fn get_image(Path(filename): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let id = filename
        .strip_suffix(".jpeg")
        .ok_or_else(|| ApiError::not_found("image not found"))?;

    let bytes = recipe_service::get_recipe_image(DatabaseManager::pool(), id).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}
