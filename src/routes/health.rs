// ABOUTME: Health check route handler
// ABOUTME: Reports service liveness and database reachability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

use crate::errors::AppError;
use crate::server::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /api/health
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        // A trivial query proves the pool is alive
        let database_ok = resources.database.get_user_count().await.is_ok();
        let status = if database_ok { "ok" } else { "degraded" };
        Ok((
            StatusCode::OK,
            Json(json!({
                "status": status,
                "database": database_ok,
            })),
        )
            .into_response())
    }
}
