// ABOUTME: Workout plan route handlers for trainer-authored weekly schedules
// ABOUTME: Provides plan CRUD with trainer-only mutation and one active plan per client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Workout plan routes
//!
//! Reading a client's plans is open to the client and trainers; creating,
//! updating, and deleting plans is trainer-only, and a trainer may only
//! modify plans they authored.

use crate::{
    errors::AppError,
    models::{UserRole, WeeklySchedule, WorkoutPlan},
    server::ServerResources,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Response for a workout plan
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Unique identifier
    pub id: String,
    /// Client the plan is assigned to
    pub client_id: String,
    /// Trainer who authored the plan
    pub trainer_id: String,
    /// Plan name
    pub name: String,
    /// Whether this is the client's current plan
    pub active: bool,
    /// Weekly schedule of prescriptions
    pub schedule: WeeklySchedule,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl From<WorkoutPlan> for PlanResponse {
    fn from(plan: WorkoutPlan) -> Self {
        Self {
            id: plan.id.to_string(),
            client_id: plan.client_id.to_string(),
            trainer_id: plan.trainer_id.to_string(),
            name: plan.name,
            active: plan.active,
            schedule: plan.schedule,
            created_at: plan.created_at.to_rfc3339(),
            updated_at: plan.updated_at.to_rfc3339(),
        }
    }
}

/// Request to create a workout plan
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    /// Client the plan is for
    pub client_id: Uuid,
    /// Plan name
    pub name: String,
    /// Weekly schedule of prescriptions
    #[serde(default)]
    pub schedule: WeeklySchedule,
    /// Whether the plan becomes the client's active plan (default true)
    pub active: Option<bool>,
}

/// Request to update a workout plan
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    /// New plan name
    pub name: Option<String>,
    /// Replacement schedule
    pub schedule: Option<WeeklySchedule>,
    /// New active flag
    pub active: Option<bool>,
}

/// Workout plan routes
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans", post(Self::handle_create))
            .route("/api/plans/:id", put(Self::handle_update))
            .route("/api/plans/:id", delete(Self::handle_delete))
            .route(
                "/api/plans/client/:client_id",
                get(Self::handle_active_plan),
            )
            .route(
                "/api/plans/client/:client_id/all",
                get(Self::handle_list_plans),
            )
            .with_state(resources)
    }

    /// Handle GET /api/plans/client/:client_id - the client's active plan
    async fn handle_active_plan(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(client_id)?;

        let plan = resources
            .database
            .get_active_plan(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("No active plan for client"))?;
        let response: PlanResponse = plan.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/plans/client/:client_id/all
    async fn handle_list_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(client_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_self_or_trainer(client_id)?;

        let plans = resources.database.list_plans(client_id).await?;
        let response: Vec<PlanResponse> = plans.into_iter().map(Into::into).collect();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/plans - create a plan for a client
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreatePlanRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_trainer()?;

        let client = resources
            .database
            .get_user_required(request.client_id)
            .await?;
        if client.role != UserRole::Client {
            return Err(AppError::invalid_input(
                "Plans can only be assigned to client accounts",
            ));
        }

        let now = Utc::now();
        let plan = WorkoutPlan {
            id: Uuid::new_v4(),
            client_id: request.client_id,
            trainer_id: auth.user_id,
            name: request.name,
            active: request.active.unwrap_or(true),
            schedule: request.schedule,
            created_at: now,
            updated_at: now,
        };
        resources.database.create_plan(&plan).await?;

        let response: PlanResponse = plan.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle PUT /api/plans/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<Uuid>,
        Json(request): Json<UpdatePlanRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_trainer()?;
        Self::require_plan_owner(&resources, plan_id, auth.user_id).await?;

        let plan = resources
            .database
            .update_plan(
                plan_id,
                request.name.as_deref(),
                request.schedule.as_ref(),
                request.active,
            )
            .await?;
        let response: PlanResponse = plan.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/plans/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(plan_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let auth = resources.authenticate(&headers)?;
        auth.require_trainer()?;
        Self::require_plan_owner(&resources, plan_id, auth.user_id).await?;

        resources.database.delete_plan(plan_id).await?;
        Ok((StatusCode::OK, Json(serde_json::json!({ "success": true }))).into_response())
    }

    /// Ensure the calling trainer authored the plan
    async fn require_plan_owner(
        resources: &Arc<ServerResources>,
        plan_id: Uuid,
        trainer_id: Uuid,
    ) -> Result<(), AppError> {
        let plan = resources.database.get_plan_required(plan_id).await?;
        if plan.trainer_id != trainer_id {
            return Err(AppError::forbidden(
                "Only the authoring trainer may modify this plan",
            ));
        }
        Ok(())
    }
}
