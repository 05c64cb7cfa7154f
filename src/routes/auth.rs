// ABOUTME: Authentication route handlers for registration, login, and session introspection
// ABOUTME: Issues session JWTs and exposes the authenticated user's profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Authentication routes
//!
//! `POST /api/auth/register` creates a trainer or client account,
//! `POST /api/auth/login` exchanges credentials for a JWT, and
//! `GET /api/auth/me` returns the profile behind a token.

use crate::{
    errors::{AppError, AppResult},
    models::{User, UserRole},
    server::ServerResources,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User's email address
    pub email: String,
    /// User's password (will be hashed)
    pub password: String,
    /// Optional display name for the user
    pub display_name: Option<String>,
    /// Account role; defaults to client
    pub role: Option<UserRole>,
    /// Trainer to assign the new client to
    pub trainer_id: Option<Uuid>,
}

/// User registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Unique identifier for the newly created user
    pub user_id: String,
    /// Success message for the registration
    pub message: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password
    pub password: String,
}

/// User info for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    /// Unique identifier for the user
    pub user_id: String,
    /// User's email address
    pub email: String,
    /// User's display name if set
    pub display_name: Option<String>,
    /// "trainer" or "client"
    pub role: String,
    /// "active" or "inactive"
    pub status: String,
    /// Trainer the user is assigned to, if any
    pub trainer_id: Option<String>,
    /// Cumulative experience points
    pub xp: i64,
    /// Current level
    pub level: i64,
    /// Current rank name
    pub rank: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email,
            display_name: user.display_name,
            role: user.role.as_str().to_owned(),
            status: user.status.as_str().to_owned(),
            trainer_id: user.trainer_id.map(|id| id.to_string()),
            xp: user.xp,
            level: user.level,
            rank: user.rank,
        }
    }
}

/// User login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// JWT authentication token
    pub jwt_token: String,
    /// When the token expires (ISO 8601 format)
    pub expires_at: String,
    /// User information
    pub user: UserInfo,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    fn validate_registration(request: &RegisterRequest) -> AppResult<()> {
        if !request.email.contains('@') {
            return Err(AppError::invalid_input("Invalid email address"));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }

    /// Handle POST /api/auth/register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        Self::validate_registration(&request)?;

        let password_hash = resources.auth_manager.hash_password(&request.password)?;
        let mut user = User::new(
            request.email,
            password_hash,
            request.display_name,
            request.role.unwrap_or(UserRole::Client),
        );

        if let Some(trainer_id) = request.trainer_id {
            let trainer = resources.database.get_user_required(trainer_id).await?;
            if trainer.role != UserRole::Trainer {
                return Err(AppError::invalid_input(
                    "trainer_id must reference a trainer account",
                ));
            }
            user.trainer_id = Some(trainer_id);
        }

        let user_id = resources.database.create_user(&user).await?;
        tracing::info!(user_id = %user_id, role = user.role.as_str(), "registered new user");

        let response = RegisterResponse {
            user_id: user_id.to_string(),
            message: "User registered successfully".to_owned(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let user = resources
            .database
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        resources
            .auth_manager
            .verify_password(&request.password, &user.password_hash)?;

        resources.database.update_last_active(user.id).await?;
        let jwt_token = resources.auth_manager.generate_token(&user)?;

        let response = LoginResponse {
            jwt_token,
            expires_at: resources.auth_manager.token_expiry().to_rfc3339(),
            user: user.into(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/auth/me
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        let user = resources.database.get_user_required(auth.user_id).await?;
        let info: UserInfo = user.into();
        Ok((StatusCode::OK, Json(info)).into_response())
    }
}
