use std::path::PathBuf;

use serde::Deserialize;
use sqlx::PgPool;

use crate::config;
use crate::database::models::Recipe;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::types::{RecordId, Role};

/// Minimum accepted recipe name length
const MIN_NAME_LEN: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct RecipePayload {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub preparation: Option<String>,
}

pub async fn add_recipe(
    pool: &PgPool,
    owner: &RecordId,
    payload: RecipePayload,
) -> Result<Recipe, ApiError> {
    let (name, ingredients, preparation) = check_recipe_data(payload)?;

    let recipe = Recipe::insert(pool, owner, &name, &ingredients, &preparation).await?;
    Ok(recipe)
}

pub async fn get_all_recipes(pool: &PgPool) -> Result<Vec<Recipe>, ApiError> {
    let recipes = Recipe::find_all(pool).await?;
    Ok(recipes)
}

pub async fn get_recipe_by_id(pool: &PgPool, id: &str) -> Result<Recipe, ApiError> {
    let id = RecordId::parse(id)?;

    Recipe::find_by_id(pool, &id)
        .await?
        .ok_or_else(recipe_not_found)
}

pub async fn edit_recipe(
    pool: &PgPool,
    id: &str,
    identity: &AuthUser,
    payload: RecipePayload,
) -> Result<Recipe, ApiError> {
    let (name, ingredients, preparation) = check_recipe_data(payload)?;
    let recipe = authorize_recipe(pool, id, identity).await?;

    Recipe::update(pool, &recipe.id, &name, &ingredients, &preparation)
        .await?
        .ok_or_else(recipe_not_found)
}

pub async fn delete_recipe(pool: &PgPool, id: &str, identity: &AuthUser) -> Result<(), ApiError> {
    let recipe = authorize_recipe(pool, id, identity).await?;

    Recipe::delete(pool, &recipe.id).await?;
    Ok(())
}

/// Persist an uploaded image blob and record its public URL on the recipe.
pub async fn attach_image(
    pool: &PgPool,
    id: &str,
    identity: &AuthUser,
    bytes: &[u8],
    host: &str,
) -> Result<Recipe, ApiError> {
    let recipe = authorize_recipe(pool, id, identity).await?;

    let path = image_blob_path(&recipe.id);
    tokio::fs::write(&path, bytes).await.map_err(|e| {
        tracing::error!("failed to write image blob {}: {}", path.display(), e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let url = format!("{}/images/{}.jpeg", host, recipe.id);
    Recipe::set_image(pool, &recipe.id, &url)
        .await?
        .ok_or_else(recipe_not_found)
}

/// Fetch the stored image bytes for a recipe.
pub async fn get_recipe_image(pool: &PgPool, id: &str) -> Result<Vec<u8>, ApiError> {
    let recipe = get_recipe_by_id(pool, id).await?;

    if recipe.image.is_none() {
        return Err(image_not_found());
    }

    tokio::fs::read(image_blob_path(&recipe.id))
        .await
        .map_err(|_| image_not_found())
}

/// Ownership guard for mutating operations: resolve the recipe, then decide
/// ALLOW/DENY from role and ownership. Read operations skip this entirely.
async fn authorize_recipe(
    pool: &PgPool,
    id: &str,
    identity: &AuthUser,
) -> Result<Recipe, ApiError> {
    let id = RecordId::parse(id)?;
    let recipe = Recipe::find_by_id(pool, &id)
        .await?
        .ok_or_else(recipe_not_found)?;

    check_recipe_access(&recipe, identity)?;
    Ok(recipe)
}

/// ALLOW for admins and for the recorded owner; everyone else is denied
/// with the same message a bad token produces, so a caller cannot tell
/// "wrong token" from "valid token, wrong owner".
fn check_recipe_access(recipe: &Recipe, identity: &AuthUser) -> Result<(), ApiError> {
    if identity.role == Role::Admin {
        return Ok(());
    }

    if recipe.user_id == identity.id {
        return Ok(());
    }

    Err(ApiError::unauthorized("jwt malformed"))
}

fn check_recipe_data(payload: RecipePayload) -> Result<(String, String, String), ApiError> {
    let (name, ingredients, preparation) =
        match (payload.name, payload.ingredients, payload.preparation) {
            (Some(name), Some(ingredients), Some(preparation)) => (name, ingredients, preparation),
            _ => return Err(invalid_entries()),
        };

    if name.chars().count() < MIN_NAME_LEN || ingredients.is_empty() || preparation.is_empty() {
        return Err(invalid_entries());
    }

    Ok((name, ingredients, preparation))
}

fn image_blob_path(id: &RecordId) -> PathBuf {
    PathBuf::from(&config::config().storage.uploads_dir).join(format!("{}.jpeg", id))
}

fn invalid_entries() -> ApiError {
    ApiError::bad_request("Invalid entries. Try again.")
}

fn recipe_not_found() -> ApiError {
    ApiError::not_found("recipe not found")
}

fn image_not_found() -> ApiError {
    ApiError::not_found("image not found")
}
