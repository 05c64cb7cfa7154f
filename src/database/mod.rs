// ABOUTME: Core database management with embedded migrations for SQLite
// ABOUTME: Owns the connection pool shared by the user, plan, and log modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Database layer
//!
//! A thin [`Database`] wrapper around a `sqlx` SQLite pool. Schema setup
//! runs through migrations embedded at compile time from `./migrations`.
//! Operations are grouped by aggregate: [`users`], [`plans`], [`logs`].

/// Workout log storage and retrieval
pub mod logs;
/// Workout plan storage and retrieval
pub mod plans;
/// User account management and XP award persistence
pub mod users;

use crate::errors::{AppError, AppResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database URL is invalid or the connection fails
    /// - `SQLite` file creation fails
    /// - A migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options =
            if database_url.starts_with("sqlite:") && !is_in_memory(database_url) {
                create_parent_dir(database_url)?;
                with_create_mode(database_url)
            } else {
                database_url.to_owned()
            };

        // SQLite in-memory databases are per-connection; a single-connection
        // pool keeps every caller on the same schema.
        let max_connections = if is_in_memory(database_url) { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run all pending migrations embedded at compile time
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails or the connection is lost.
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed successfully");
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

// The configured URL may already carry options (e.g. cache=shared)
fn with_create_mode(database_url: &str) -> String {
    if database_url.contains('?') {
        format!("{database_url}&mode=rwc")
    } else {
        format!("{database_url}?mode=rwc")
    }
}

fn create_parent_dir(database_url: &str) -> AppResult<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::database(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}
