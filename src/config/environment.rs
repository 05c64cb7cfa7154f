// ABOUTME: Environment-variable driven configuration for the AlterFit server
// ABOUTME: Loads HTTP port, database URL, JWT secret, and auth tuning from the process env
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Server configuration
//!
//! Environment-only configuration: every knob has an `ALTERFIT_`-prefixed
//! variable with a development default. The JWT secret default is accepted
//! only to keep local development frictionless; deployments must set
//! `ALTERFIT_JWT_SECRET`.

use crate::errors::{AppError, AppResult};
use std::env;

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default database URL (file-backed SQLite in the working directory)
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/alterfit.db";
/// Default token lifetime in hours (one week, matching the original client sessions)
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 168;

/// Runtime configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    pub http_port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// Secret used to sign session JWTs
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub token_expiry_hours: i64,
    /// Bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a variable is present but not
    /// parseable (e.g. a non-numeric port).
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_var("ALTERFIT_HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let database_url =
            env::var("ALTERFIT_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());
        let jwt_secret = env::var("ALTERFIT_JWT_SECRET")
            .unwrap_or_else(|_| "alterfit-dev-secret-do-not-use-in-production".to_owned());
        let token_expiry_hours =
            parse_var("ALTERFIT_TOKEN_EXPIRY_HOURS", DEFAULT_TOKEN_EXPIRY_HOURS)?;
        let bcrypt_cost = parse_var("ALTERFIT_BCRYPT_COST", bcrypt::DEFAULT_COST)?;

        if token_expiry_hours <= 0 {
            return Err(AppError::config(
                "ALTERFIT_TOKEN_EXPIRY_HOURS must be positive",
            ));
        }

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            token_expiry_hours,
            bcrypt_cost,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
