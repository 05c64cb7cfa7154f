// ABOUTME: AlterFit server library - gamified fitness coaching backend
// ABOUTME: Progression engine, SQLite persistence, JWT auth, and the REST API surface

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! # AlterFit Server
//!
//! Backend for a trainer/client fitness coaching app. Trainers author
//! weekly workout plans; clients log sessions against them. Completing a
//! session earns XP, and cumulative XP drives a level and a named rank via
//! the pure [`progression`] engine.
//!
//! ## Architecture
//!
//! - [`progression`] - pure XP/level/rank math, no I/O
//! - [`models`] - domain types (users, plans, logs)
//! - [`database`] - SQLite persistence via sqlx, including atomic XP awards
//! - [`auth`] - bcrypt password hashing and HS256 session JWTs
//! - [`routes`] - axum route handlers grouped by resource
//! - [`server`] - shared state and router assembly
//! - [`config`] - environment-driven configuration
//! - [`errors`] - application error type mapped to HTTP responses

/// Authentication and session token management
pub mod auth;
/// Runtime configuration
pub mod config;
/// SQLite persistence layer
pub mod database;
/// Application errors and HTTP mapping
pub mod errors;
/// Domain model types
pub mod models;
/// Pure XP, level, and rank computation
pub mod progression;
/// HTTP route handlers
pub mod routes;
/// Shared server state and router assembly
pub mod server;
