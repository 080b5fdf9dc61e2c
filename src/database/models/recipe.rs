use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::types::RecordId;

/// A recipe document. `userId` records the owner; `image` is the public URL
/// set once a blob has been attached.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub ingredients: String,
    pub preparation: String,
    #[serde(rename = "userId")]
    pub user_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

const COLUMNS: &str = "id, name, ingredients, preparation, user_id, image";

impl Recipe {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            ingredients: row.try_get("ingredients")?,
            preparation: row.try_get("preparation")?,
            user_id: row.try_get("user_id")?,
            image: row.try_get("image")?,
        })
    }

    pub async fn insert(
        pool: &PgPool,
        owner: &RecordId,
        name: &str,
        ingredients: &str,
        preparation: &str,
    ) -> Result<Recipe, sqlx::Error> {
        let id = RecordId::generate();

        sqlx::query(
            "INSERT INTO recipes (id, name, ingredients, preparation, user_id) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&id)
        .bind(name)
        .bind(ingredients)
        .bind(preparation)
        .bind(owner)
        .execute(pool)
        .await?;

        Ok(Recipe {
            id,
            name: name.to_string(),
            ingredients: ingredients.to_string(),
            preparation: preparation.to_string(),
            user_id: owner.clone(),
            image: None,
        })
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
        let rows = sqlx::query(&format!("SELECT {} FROM recipes", COLUMNS))
            .fetch_all(pool)
            .await?;

        rows.iter().map(Self::from_row).collect()
    }

    pub async fn find_by_id(pool: &PgPool, id: &RecordId) -> Result<Option<Recipe>, sqlx::Error> {
        let row = sqlx::query(&format!("SELECT {} FROM recipes WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// Overwrite the editable fields of a recipe, returning the new state.
    pub async fn update(
        pool: &PgPool,
        id: &RecordId,
        name: &str,
        ingredients: &str,
        preparation: &str,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "UPDATE recipes SET name = $2, ingredients = $3, preparation = $4 WHERE id = $1 RETURNING {}",
            COLUMNS
        ))
        .bind(id)
        .bind(name)
        .bind(ingredients)
        .bind(preparation)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    pub async fn delete(pool: &PgPool, id: &RecordId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Record the public URL of an attached image, returning the new state.
    pub async fn set_image(
        pool: &PgPool,
        id: &RecordId,
        image_url: &str,
    ) -> Result<Option<Recipe>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "UPDATE recipes SET image = $2 WHERE id = $1 RETURNING {}",
            COLUMNS
        ))
        .bind(id)
        .bind(image_url)
        .fetch_optional(pool)
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }
}
