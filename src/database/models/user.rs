use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::types::{RecordId, Role};

/// A registered account. The password hash never leaves the process: the
/// field is excluded from serialization entirely.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
}

impl User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            role,
        })
    }

    /// Look up a user by email. `None` when no such account exists.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query("SELECT id, name, email, password, role FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// Insert a new account with a freshly generated id.
    pub async fn insert(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        let id = RecordId::generate();

        sqlx::query("INSERT INTO users (id, name, email, password, role) VALUES ($1, $2, $3, $4, $5)")
            .bind(&id)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(role.as_str())
            .execute(pool)
            .await?;

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            role,
        })
    }
}
