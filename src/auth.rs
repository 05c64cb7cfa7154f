// ABOUTME: Authentication manager for password hashing and JWT issuance/validation
// ABOUTME: Provides the AuthResult consumed by route handlers for role gating
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Authentication and session tokens
//!
//! Passwords are hashed with bcrypt; sessions are stateless HS256 JWTs
//! carrying the user id and role. Route modules call
//! [`AuthManager::authenticate_request`] with the `Authorization` header
//! value and gate trainer-only operations on the returned role.

use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for an AlterFit session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// User role ("trainer" or "client")
    pub role: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Authenticated caller identity extracted from a validated token
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// User ID from the token subject
    pub user_id: Uuid,
    /// Role claim from the token
    pub role: UserRole,
}

impl AuthResult {
    /// Whether the caller is a trainer
    #[must_use]
    pub fn is_trainer(&self) -> bool {
        self.role == UserRole::Trainer
    }

    /// Require the caller to be a trainer
    ///
    /// # Errors
    ///
    /// Returns a forbidden error for client callers.
    pub fn require_trainer(&self) -> AppResult<()> {
        if self.is_trainer() {
            Ok(())
        } else {
            Err(AppError::forbidden("Trainer access required"))
        }
    }

    /// Require the caller to be either the user themselves or a trainer
    ///
    /// # Errors
    ///
    /// Returns a forbidden error otherwise.
    pub fn require_self_or_trainer(&self, user_id: Uuid) -> AppResult<()> {
        if self.user_id == user_id || self.is_trainer() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Only the account owner or a trainer may perform this operation",
            ))
        }
    }
}

/// Issues and validates session tokens, hashes passwords
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl AuthManager {
    /// Create a new auth manager
    #[must_use]
    pub fn new(jwt_secret: Vec<u8>, token_expiry_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            jwt_secret,
            token_expiry_hours,
            bcrypt_cost,
        }
    }

    /// Hash a plaintext password with bcrypt
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
    }

    /// Verify a plaintext password against a stored bcrypt hash
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the password does not match or the
    /// stored hash is malformed.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<()> {
        let valid = bcrypt::verify(password, password_hash)
            .map_err(|e| AppError::auth_invalid(format!("Password verification failed: {e}")))?;
        if valid {
            Ok(())
        } else {
            Err(AppError::auth_invalid("Invalid email or password"))
        }
    }

    /// Generate a session token for a user
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails.
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_owned(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Token lifetime expressed as an absolute expiry from now
    #[must_use]
    pub fn token_expiry(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::hours(self.token_expiry_hours)
    }

    /// Validate a raw JWT and return its claims
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the token is expired, malformed,
    /// or has an invalid signature.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))
    }

    /// Authenticate an `Authorization` header value (`Bearer <jwt>`)
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the header is missing, not a
    /// bearer token, or the token fails validation.
    pub fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header =
            auth_header.ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token subject: {e}")))?;
        Ok(AuthResult {
            user_id,
            role: UserRole::from_str_lossy(&claims.role),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn test_manager() -> AuthManager {
        // Cost 4 keeps hashing fast in tests
        AuthManager::new(b"test-secret".to_vec(), 24, 4)
    }

    #[test]
    fn test_password_hash_and_verify() {
        let manager = test_manager();
        let hash = manager.hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        manager.verify_password("hunter2", &hash).unwrap();
        assert!(manager.verify_password("wrong", &hash).is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let manager = test_manager();
        let user = User::new(
            "coach@alterfit.com".into(),
            "hash".into(),
            Some("Caster".into()),
            UserRole::Trainer,
        );
        let token = manager.generate_token(&user).unwrap();
        let auth = manager
            .authenticate_request(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(auth.user_id, user.id);
        assert!(auth.is_trainer());
    }

    #[test]
    fn test_rejects_missing_and_malformed_headers() {
        let manager = test_manager();
        assert!(manager.authenticate_request(None).is_err());
        assert!(manager.authenticate_request(Some("Basic abc")).is_err());
        assert!(manager
            .authenticate_request(Some("Bearer not-a-token"))
            .is_err());
    }

    #[test]
    fn test_role_gates() {
        let manager = test_manager();
        let client = User::new_client("c@alterfit.com".into(), "hash".into(), None);
        let token = manager.generate_token(&client).unwrap();
        let auth = manager
            .authenticate_request(Some(&format!("Bearer {token}")))
            .unwrap();
        assert!(auth.require_trainer().is_err());
        assert!(auth.require_self_or_trainer(client.id).is_ok());
        assert!(auth.require_self_or_trainer(Uuid::new_v4()).is_err());
    }
}
