/// Shared types used across the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Length in characters of a record identifier (12 bytes, hex-encoded)
pub const RECORD_ID_LEN: usize = 24;

/// Opaque record identifier assigned by the API on insert.
///
/// Always 24 lowercase hex characters. Anything else is rejected at the
/// boundary with `422 Wrong id format` before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier from 12 random bytes.
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let mut hex = String::with_capacity(RECORD_ID_LEN);
        for b in &bytes[..RECORD_ID_LEN / 2] {
            hex.push_str(&format!("{:02x}", b));
        }
        Self(hex)
    }

    /// Parse an identifier supplied by a client.
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        if input.len() == RECORD_ID_LEN && input.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(input.to_ascii_lowercase()))
        } else {
            Err(ApiError::unprocessable_entity("Wrong id format"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// User role hierarchy. Admins bypass recipe ownership checks and may
/// register other admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
