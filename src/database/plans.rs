// ABOUTME: Workout plan database operations
// ABOUTME: Handles plan CRUD with one-active-plan-per-client bookkeeping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{WeeklySchedule, WorkoutPlan};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create a workout plan
    ///
    /// When the new plan is active, the client's previously active plans are
    /// deactivated in the same transaction so at most one plan is active per
    /// client.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or a database operation fails
    pub async fn create_plan(&self, plan: &WorkoutPlan) -> AppResult<Uuid> {
        let schedule_json = serde_json::to_string(&plan.schedule)?;

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        if plan.active {
            sqlx::query("UPDATE workout_plans SET active = 0 WHERE client_id = $1 AND active = 1")
                .bind(plan.client_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to deactivate previous plans: {e}"))
                })?;
        }

        sqlx::query(
            r"
            INSERT INTO workout_plans (
                id, client_id, trainer_id, name, active, schedule, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(plan.id.to_string())
        .bind(plan.client_id.to_string())
        .bind(plan.trainer_id.to_string())
        .bind(&plan.name)
        .bind(plan.active)
        .bind(schedule_json)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plan: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit plan: {e}")))?;

        Ok(plan.id)
    }

    /// Get a plan by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_plan(&self, plan_id: Uuid) -> AppResult<Option<WorkoutPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, name, active, schedule, created_at, updated_at
            FROM workout_plans WHERE id = $1
            ",
        )
        .bind(plan_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        row.map(|r| Self::row_to_plan(&r)).transpose()
    }

    /// Get a plan by ID, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not found or the query fails
    pub async fn get_plan_required(&self, plan_id: Uuid) -> AppResult<WorkoutPlan> {
        self.get_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Plan with ID: {plan_id}")))
    }

    /// Get the client's active plan, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_active_plan(&self, client_id: Uuid) -> AppResult<Option<WorkoutPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, name, active, schedule, created_at, updated_at
            FROM workout_plans
            WHERE client_id = $1 AND active = 1
            ORDER BY updated_at DESC
            LIMIT 1
            ",
        )
        .bind(client_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get active plan: {e}")))?;

        row.map(|r| Self::row_to_plan(&r)).transpose()
    }

    /// List all plans for a client, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_plans(&self, client_id: Uuid) -> AppResult<Vec<WorkoutPlan>> {
        let rows = sqlx::query(
            r"
            SELECT id, client_id, trainer_id, name, active, schedule, created_at, updated_at
            FROM workout_plans
            WHERE client_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(client_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    /// Update a plan's name, schedule, and active flag
    ///
    /// Activating a plan deactivates the client's other plans.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not found or a database operation fails
    pub async fn update_plan(
        &self,
        plan_id: Uuid,
        name: Option<&str>,
        schedule: Option<&WeeklySchedule>,
        active: Option<bool>,
    ) -> AppResult<WorkoutPlan> {
        let existing = self.get_plan_required(plan_id).await?;
        let schedule_json = schedule.map(serde_json::to_string).transpose()?;

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        if active == Some(true) {
            sqlx::query(
                "UPDATE workout_plans SET active = 0 WHERE client_id = $1 AND id != $2 AND active = 1",
            )
            .bind(existing.client_id.to_string())
            .bind(plan_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to deactivate previous plans: {e}")))?;
        }

        sqlx::query(
            r"
            UPDATE workout_plans SET
                name = COALESCE($1, name),
                schedule = COALESCE($2, schedule),
                active = COALESCE($3, active),
                updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(name)
        .bind(schedule_json)
        .bind(active)
        .bind(Utc::now())
        .bind(plan_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update plan: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit plan update: {e}")))?;

        self.get_plan_required(plan_id).await
    }

    /// Delete a plan
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is not found or the delete fails
    pub async fn delete_plan(&self, plan_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM workout_plans WHERE id = $1")
            .bind(plan_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete plan: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Plan with ID: {plan_id}")));
        }
        Ok(())
    }

    /// Convert a database row to a `WorkoutPlan`
    fn row_to_plan(row: &SqliteRow) -> AppResult<WorkoutPlan> {
        let id: String = row.get("id");
        let client_id: String = row.get("client_id");
        let trainer_id: String = row.get("trainer_id");
        let schedule_json: String = row.get("schedule");

        Ok(WorkoutPlan {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse plan id UUID: {e}")))?,
            client_id: Uuid::parse_str(&client_id)
                .map_err(|e| AppError::internal(format!("Failed to parse client id UUID: {e}")))?,
            trainer_id: Uuid::parse_str(&trainer_id)
                .map_err(|e| AppError::internal(format!("Failed to parse trainer id UUID: {e}")))?,
            name: row.get("name"),
            active: row.get("active"),
            schedule: serde_json::from_str(&schedule_json)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
