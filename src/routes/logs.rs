// ABOUTME: Workout log route handlers including XP awards for completed sessions
// ABOUTME: Converts logged training volume into XP and reports level-up events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Workout log routes
//!
//! Logging a completed session is the one place XP enters the system: the
//! award amount is derived from the session's training volume, applied
//! atomically to the client's profile, and the response carries the updated
//! totals plus the optional level-up event. The server never decides what to
//! celebrate; the client renders (or ignores) the event.

use crate::{
    errors::AppError,
    models::{ExerciseLog, WorkoutLog},
    progression::LevelUpEvent,
    server::ServerResources,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Base XP for finishing any session
const XP_BASE_AWARD: i64 = 100;
/// Volume units per bonus XP point
const XP_VOLUME_DIVISOR: i64 = 100;

/// XP award for a completed session of the given training volume
///
/// Application policy, not part of the progression engine's contract:
/// `100 + volume / 100`.
const fn xp_for_volume(volume: i64) -> i64 {
    XP_BASE_AWARD + volume / XP_VOLUME_DIVISOR
}

/// Response for a workout log
#[derive(Debug, Serialize, Deserialize)]
pub struct LogResponse {
    /// Unique identifier
    pub id: String,
    /// Client who performed the session
    pub client_id: String,
    /// When the session took place
    pub date: String,
    /// Weekday slot of the plan
    pub day: Option<String>,
    /// Whether the session was finished
    pub completed: bool,
    /// Total training volume
    pub volume: i64,
    /// Per-exercise set details
    pub exercises: Vec<ExerciseLog>,
    /// Session notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl From<WorkoutLog> for LogResponse {
    fn from(log: WorkoutLog) -> Self {
        Self {
            id: log.id.to_string(),
            client_id: log.client_id.to_string(),
            date: log.date.to_rfc3339(),
            day: log.day,
            completed: log.completed,
            volume: log.volume,
            exercises: log.exercises,
            notes: log.notes,
            created_at: log.created_at.to_rfc3339(),
        }
    }
}

/// Updated profile totals after an XP award
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileProgress {
    /// New cumulative XP
    pub xp: i64,
    /// New level
    pub level: i64,
    /// New rank name
    pub rank: String,
}

/// Response for creating or completing a workout log
#[derive(Debug, Serialize)]
pub struct LoggedWorkoutResponse {
    /// The stored log
    pub log: LogResponse,
    /// XP granted by this request, if the session was completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_awarded: Option<i64>,
    /// Profile totals after the award
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileProgress>,
    /// Level transition, if the award crossed a level boundary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUpEvent>,
}

/// Request to create a workout log
#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    /// Client the session belongs to
    pub client_id: Uuid,
    /// When the session took place (defaults to now)
    pub date: Option<DateTime<Utc>>,
    /// Weekday slot of the plan
    pub day: Option<String>,
    /// Whether the session was finished
    #[serde(default)]
    pub completed: bool,
    /// Training volume; computed from the sets when omitted
    pub volume: Option<i64>,
    /// Per-exercise set details
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    /// Session notes
    pub notes: Option<String>,
}

/// Request to update a workout log
#[derive(Debug, Deserialize)]
pub struct UpdateLogRequest {
    /// Mark the session finished or not
    pub completed: Option<bool>,
    /// Replacement volume
    pub volume: Option<i64>,
    /// Replacement set details
    pub exercises: Option<Vec<ExerciseLog>>,
    /// Replacement notes
    pub notes: Option<String>,
}

/// Workout log routes
pub struct LogRoutes;

impl LogRoutes {
    /// Create all log routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/logs", post(Self::handle_create))
            .route("/api/logs/:id", get(Self::handle_get))
            .route("/api/logs/:id", put(Self::handle_update))
            .route("/api/logs/:id", delete(Self::handle_delete))
            .route("/api/logs/client/:client_id", get(Self::handle_list))
            .with_state(resources)
    }

    /// Handle GET /api/logs/client/:client_id
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(client_id)?;

        let logs = resources.database.list_logs(client_id).await?;
        let response: Vec<LogResponse> = logs.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/logs/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        let log = resources.database.get_log_required(log_id).await?;
        auth.require_self_or_trainer(log.client_id)?;

        let response: LogResponse = log.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/logs - record a session, awarding XP when completed
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateLogRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(request.client_id)?;

        // The client must exist before we attach a log to them
        resources
            .database
            .get_user_required(request.client_id)
            .await?;

        let now = Utc::now();
        let mut log = WorkoutLog {
            id: Uuid::new_v4(),
            client_id: request.client_id,
            date: request.date.unwrap_or(now),
            day: request.day,
            completed: request.completed,
            volume: 0,
            exercises: request.exercises,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };
        log.volume = match request.volume {
            Some(volume) if volume < 0 => {
                return Err(AppError::invalid_input("Volume must be non-negative"))
            }
            Some(volume) => volume,
            None => log.computed_volume(),
        };

        resources.database.create_log(&log).await?;

        let mut response = LoggedWorkoutResponse {
            log: log.clone().into(),
            xp_awarded: None,
            profile: None,
            level_up: None,
        };
        if log.completed {
            Self::apply_award(&resources, &mut response, log.client_id, log.volume).await?;
        }

        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle PUT /api/logs/:id - XP is awarded when this update completes the session
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
        Json(request): Json<UpdateLogRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        let existing = resources.database.get_log_required(log_id).await?;
        auth.require_self_or_trainer(existing.client_id)?;

        if let Some(volume) = request.volume {
            if volume < 0 {
                return Err(AppError::invalid_input("Volume must be non-negative"));
            }
        }

        let log = resources
            .database
            .update_log(
                log_id,
                request.completed,
                request.volume,
                request.exercises.as_deref(),
                request.notes.as_deref(),
            )
            .await?;

        // Award only on the transition into the completed state; re-saving an
        // already-completed session must not double-award.
        let newly_completed = !existing.completed && log.completed;

        let mut response = LoggedWorkoutResponse {
            log: log.clone().into(),
            xp_awarded: None,
            profile: None,
            level_up: None,
        };
        if newly_completed {
            Self::apply_award(&resources, &mut response, log.client_id, log.volume).await?;
        }

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/logs/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        let log = resources.database.get_log_required(log_id).await?;
        auth.require_self_or_trainer(log.client_id)?;

        resources.database.delete_log(log_id).await?;
        Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response())
    }

    /// Apply the volume-derived XP award and fold the result into the response
    async fn apply_award(
        resources: &Arc<ServerResources>,
        response: &mut LoggedWorkoutResponse,
        client_id: Uuid,
        volume: i64,
    ) -> Result<(), AppError> {
        let amount = xp_for_volume(volume);
        let (user, event) = resources.database.award_workout_xp(client_id, amount).await?;
        tracing::info!(
            client_id = %client_id,
            amount,
            new_xp = user.xp,
            level_up = event.is_some(),
            "awarded workout XP"
        );
        response.xp_awarded = Some(amount);
        response.profile = Some(ProfileProgress {
            xp: user.xp,
            level: user.level,
            rank: user.rank,
        });
        response.level_up = event;
        Ok(())
    }
}
