//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    pub password: String,
}

/// Data for inserting a user (password already hashed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name; may be left out by the login-style form
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id as a string
    pub sub: String,
    pub user_id: i32,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, issued_at: i64, expiration_hours: u64) -> Self {
        Self {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            exp: i64::try_from(expiration_hours)
                .unwrap_or(i64::MAX)
                .saturating_mul(3600)
                .saturating_add(issued_at),
            iat: issued_at,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
