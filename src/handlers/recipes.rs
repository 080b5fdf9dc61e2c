use axum::{
    extract::{Extension, Host, Multipart, Path},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::database::manager::DatabaseManager;
use crate::database::models::Recipe;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::recipe_service::{self, RecipePayload};

/// GET /recipes - list all recipes. No authorization required.
pub async fn get_all() -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = recipe_service::get_all_recipes(DatabaseManager::pool()).await?;
    Ok(Json(recipes))
}

/// GET /recipes/:id - fetch a single recipe. No authorization required.
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Recipe>, ApiError> {
    let recipe = recipe_service::get_recipe_by_id(DatabaseManager::pool(), &id).await?;
    Ok(Json(recipe))
}

/// POST /recipes - create a recipe owned by the authenticated user
pub async fn create(
    Extension(identity): Extension<AuthUser>,
    payload: Option<Json<RecipePayload>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let recipe =
        recipe_service::add_recipe(DatabaseManager::pool(), &identity.id, payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "recipe": recipe }))))
}

/// PUT /recipes/:id - edit a recipe (owner or admin)
pub async fn edit(
    Path(id): Path<String>,
    Extension(identity): Extension<AuthUser>,
    payload: Option<Json<RecipePayload>>,
) -> Result<Json<Recipe>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let recipe =
        recipe_service::edit_recipe(DatabaseManager::pool(), &id, &identity, payload).await?;

    Ok(Json(recipe))
}

/// DELETE /recipes/:id - delete a recipe (owner or admin)
pub async fn remove(
    Path(id): Path<String>,
    Extension(identity): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    recipe_service::delete_recipe(DatabaseManager::pool(), &id, &identity).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /recipes/:id/image - attach a JPEG to a recipe (owner or admin).
/// Expects a multipart body with an `image` field.
pub async fn put_image(
    Path(id): Path<String>,
    Host(host): Host,
    Extension(identity): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<Recipe>, ApiError> {
    let mut bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| invalid_entries())?
    {
        if field.name() == Some("image") {
            bytes = Some(field.bytes().await.map_err(|_| invalid_entries())?);
            break;
        }
    }
    let bytes = bytes.ok_or_else(invalid_entries)?;

    let recipe = recipe_service::attach_image(
        DatabaseManager::pool(),
        &id,
        &identity,
        &bytes,
        &host,
    )
    .await?;

    Ok(Json(recipe))
}

fn invalid_entries() -> ApiError {
    ApiError::bad_request("Invalid entries. Try again.")
}
