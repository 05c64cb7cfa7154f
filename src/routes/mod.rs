// ABOUTME: Route module organization for AlterFit HTTP endpoints
// ABOUTME: Groups route definitions by domain with thin handlers delegating to the database layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Route modules for the AlterFit server
//!
//! Each domain module exposes a `XxxRoutes` struct whose `routes()`
//! constructor returns an axum `Router` over the shared
//! [`ServerResources`](crate::server::ServerResources). Handlers stay thin:
//! authenticate, gate on role, delegate to the database layer, shape the
//! response DTO.

/// Authentication routes (register, login, current user)
pub mod auth;
/// Health check route
pub mod health;
/// Workout log routes, including XP award on session completion
pub mod logs;
/// Workout plan routes
pub mod plans;
/// User roster and progression display routes
pub mod users;

pub use auth::{
    AuthRoutes, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo,
};
pub use health::HealthRoutes;
pub use logs::{LogResponse, LogRoutes, LoggedWorkoutResponse};
pub use plans::{PlanResponse, PlanRoutes};
pub use users::{ProgressResponse, UserRoutes};
