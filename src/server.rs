// ABOUTME: Server resource container and HTTP router assembly
// ABOUTME: Wires the database, auth manager, and route modules into one axum app
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Server assembly
//!
//! [`ServerResources`] bundles the shared state (database pool, auth
//! manager, config) handed to every route module. [`build_router`] merges
//! the domain routers and layers request tracing and CORS on top.

use crate::{
    auth::{AuthManager, AuthResult},
    config::ServerConfig,
    database::Database,
    errors::{AppError, AppResult},
    routes::{AuthRoutes, HealthRoutes, LogRoutes, PlanRoutes, UserRoutes},
};
use axum::{http::HeaderMap, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared state for all route handlers
pub struct ServerResources {
    /// Database connection pool
    pub database: Database,
    /// Session token issuance and validation
    pub auth_manager: AuthManager,
    /// Runtime configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Create the shared resource container
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        Self {
            database,
            auth_manager,
            config,
        }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the `Authorization` header is
    /// missing or does not carry a valid bearer token.
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let auth_header = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());
        self.auth_manager.authenticate_request(auth_header)
    }
}

/// Build the complete application router
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(UserRoutes::routes(resources.clone()))
        .merge(PlanRoutes::routes(resources.clone()))
        .merge(LogRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind the configured port and serve until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let port = resources.config.http_port;
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind port {port}: {e}")))?;
    info!(port, "AlterFit server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
