//! Registration, login and token service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginRequest, NewUser, RegisterRequest, User, UserClaims},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Create an account and return it with a fresh token
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(User, String)> {
        let password_hash = self.hash_password(&request.password)?;

        let user = self
            .users
            .create(&NewUser {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Authenticate by email and return a JWT token.
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> AppResult<String> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(&user, &request.password)? {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    /// Create JWT token for a user
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let claims = UserClaims::new(user, Utc::now().timestamp(), self.config.jwt_expiration_hours);

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate a bearer token
    pub fn decode_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }

    pub fn require_token_for_writes(&self) -> bool {
        self.config.require_token_for_writes
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
