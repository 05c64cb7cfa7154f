// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and user creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(dead_code)]

//! Shared test utilities for `alterfit_server`
//!
//! Common setup functions to reduce duplication across integration tests:
//! an in-memory database, server resources with a fast bcrypt cost, and
//! trainer/client account factories with unique emails.

use alterfit_server::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    models::{User, UserRole},
    server::ServerResources,
};
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Password used for every test account
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Configuration for tests: in-memory database, fast bcrypt cost
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        jwt_secret: "test-jwt-secret".to_owned(),
        token_expiry_hours: 24,
        bcrypt_cost: 4,
    }
}

/// Create a fresh in-memory database with migrations applied
pub async fn create_test_database() -> Result<Database> {
    Ok(Database::new("sqlite::memory:").await?)
}

/// Create server resources backed by an in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let config = test_config();
    let database = Database::new(&config.database_url).await?;
    let auth_manager = AuthManager::new(
        config.jwt_secret.clone().into_bytes(),
        config.token_expiry_hours,
        config.bcrypt_cost,
    );
    Ok(Arc::new(ServerResources::new(database, auth_manager, config)))
}

/// Generate a unique email so tests never collide on the unique constraint
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@alterfit.test", Uuid::new_v4())
}

/// Create and persist a trainer account
pub async fn create_test_trainer(resources: &ServerResources) -> Result<User> {
    let hash = resources.auth_manager.hash_password(TEST_PASSWORD)?;
    let user = User::new(
        unique_email("trainer"),
        hash,
        Some("Test Trainer".to_owned()),
        UserRole::Trainer,
    );
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Create and persist a client account, optionally assigned to a trainer
pub async fn create_test_client(
    resources: &ServerResources,
    trainer_id: Option<Uuid>,
) -> Result<User> {
    let hash = resources.auth_manager.hash_password(TEST_PASSWORD)?;
    let mut user = User::new_client(unique_email("client"), hash, Some("Test Client".to_owned()));
    user.trainer_id = trainer_id;
    resources.database.create_user(&user).await?;
    Ok(user)
}

/// Produce an `Authorization` header value for the given user
pub fn bearer_token(resources: &ServerResources, user: &User) -> Result<String> {
    Ok(format!(
        "Bearer {}",
        resources.auth_manager.generate_token(user)?
    ))
}
