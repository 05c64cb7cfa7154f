// ABOUTME: User roster and profile route handlers
// ABOUTME: Exposes trainer client lists, profile updates, and progression display data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! User routes
//!
//! Trainers list and manage their client roster; any authenticated user can
//! read their own profile. `GET /api/users/:id/progress` serves the
//! progress-bar payload the client renders under the XP bar.

use crate::{
    errors::AppError,
    models::UserStatus,
    progression::{self, Rank},
    routes::auth::UserInfo,
    server::ServerResources,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Profile update request
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name
    pub display_name: Option<String>,
    /// New account status
    pub status: Option<UserStatus>,
}

/// Progression display payload for a user
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// User ID
    pub user_id: String,
    /// Cumulative XP total
    pub xp: i64,
    /// Current level
    pub level: i64,
    /// Current rank
    pub rank: Rank,
    /// XP earned since entering the current level
    pub current_level_xp: i64,
    /// XP a level requires
    pub xp_needed_for_level: i64,
    /// Progress-bar fraction in `[0, 1]`
    pub fraction: f64,
    /// XP remaining until the next level
    pub xp_to_next_level: i64,
}

/// User routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users/clients", get(Self::handle_list_clients))
            .route("/api/users/:id", get(Self::handle_get))
            .route("/api/users/:id", put(Self::handle_update))
            .route("/api/users/:id/progress", get(Self::handle_progress))
            .with_state(resources)
    }

    /// Handle GET /api/users/clients - the calling trainer's roster
    async fn handle_list_clients(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_trainer()?;

        let clients = resources.database.list_clients(auth.user_id).await?;
        let response: Vec<UserInfo> = clients.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/users/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(user_id)?;

        let user = resources.database.get_user_required(user_id).await?;
        let info: UserInfo = user.into();
        Ok((StatusCode::OK, Json(info)).into_response())
    }

    /// Handle PUT /api/users/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<Uuid>,
        Json(request): Json<UpdateUserRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(user_id)?;

        let user = resources
            .database
            .update_user_profile(user_id, request.display_name.as_deref(), request.status)
            .await?;
        let info: UserInfo = user.into();
        Ok((StatusCode::OK, Json(info)).into_response())
    }

    /// Handle GET /api/users/:id/progress
    async fn handle_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(user_id)?;

        let user = resources.database.get_user_required(user_id).await?;
        let progress = progression::compute_progress(user.xp)?;
        let rank = progression::compute_rank(user.xp)?;

        let response = ProgressResponse {
            user_id: user.id.to_string(),
            xp: user.xp,
            level: progress.level,
            rank,
            current_level_xp: progress.current_level_xp,
            xp_needed_for_level: progress.xp_needed_for_level,
            fraction: progress.fraction,
            xp_to_next_level: progression::xp_to_next_level(user.xp)?,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
