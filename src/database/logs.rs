// ABOUTME: Workout log database operations
// ABOUTME: Handles session log CRUD with per-exercise set details stored as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{ExerciseLog, WorkoutLog};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create a workout log
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn create_log(&self, log: &WorkoutLog) -> AppResult<Uuid> {
        let exercises_json = serde_json::to_string(&log.exercises)?;

        sqlx::query(
            r"
            INSERT INTO workout_logs (
                id, client_id, date, day, completed, volume, exercises, notes,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(log.id.to_string())
        .bind(log.client_id.to_string())
        .bind(log.date)
        .bind(&log.day)
        .bind(log.completed)
        .bind(log.volume)
        .bind(exercises_json)
        .bind(&log.notes)
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout log: {e}")))?;

        Ok(log.id)
    }

    /// Get a workout log by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_log(&self, log_id: Uuid) -> AppResult<Option<WorkoutLog>> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, date, day, completed, volume, exercises, notes,
                   created_at, updated_at
            FROM workout_logs WHERE id = $1
            ",
        )
        .bind(log_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout log: {e}")))?;

        row.map(|r| Self::row_to_log(&r)).transpose()
    }

    /// Get a workout log by ID, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if the log is not found or the query fails
    pub async fn get_log_required(&self, log_id: Uuid) -> AppResult<WorkoutLog> {
        self.get_log(log_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout log with ID: {log_id}")))
    }

    /// List a client's workout logs, most recent session first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_logs(&self, client_id: Uuid) -> AppResult<Vec<WorkoutLog>> {
        let rows = sqlx::query(
            r"
            SELECT id, client_id, date, day, completed, volume, exercises, notes,
                   created_at, updated_at
            FROM workout_logs
            WHERE client_id = $1
            ORDER BY date DESC
            ",
        )
        .bind(client_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list workout logs: {e}")))?;

        rows.iter().map(Self::row_to_log).collect()
    }

    /// Update a workout log's mutable fields
    ///
    /// # Errors
    ///
    /// Returns an error if the log is not found or the update fails
    pub async fn update_log(
        &self,
        log_id: Uuid,
        completed: Option<bool>,
        volume: Option<i64>,
        exercises: Option<&[ExerciseLog]>,
        notes: Option<&str>,
    ) -> AppResult<WorkoutLog> {
        let exercises_json = exercises.map(serde_json::to_string).transpose()?;

        let result = sqlx::query(
            r"
            UPDATE workout_logs SET
                completed = COALESCE($1, completed),
                volume = COALESCE($2, volume),
                exercises = COALESCE($3, exercises),
                notes = COALESCE($4, notes),
                updated_at = $5
            WHERE id = $6
            ",
        )
        .bind(completed)
        .bind(volume)
        .bind(exercises_json)
        .bind(notes)
        .bind(Utc::now())
        .bind(log_id.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update workout log: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout log with ID: {log_id}")));
        }

        self.get_log_required(log_id).await
    }

    /// Delete a workout log
    ///
    /// # Errors
    ///
    /// Returns an error if the log is not found or the delete fails
    pub async fn delete_log(&self, log_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM workout_logs WHERE id = $1")
            .bind(log_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout log: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout log with ID: {log_id}")));
        }
        Ok(())
    }

    /// Convert a database row to a `WorkoutLog`
    fn row_to_log(row: &SqliteRow) -> AppResult<WorkoutLog> {
        let id: String = row.get("id");
        let client_id: String = row.get("client_id");
        let exercises_json: String = row.get("exercises");

        Ok(WorkoutLog {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse log id UUID: {e}")))?,
            client_id: Uuid::parse_str(&client_id)
                .map_err(|e| AppError::internal(format!("Failed to parse client id UUID: {e}")))?,
            date: row.get("date"),
            day: row.get("day"),
            completed: row.get("completed"),
            volume: row.get("volume"),
            exercises: serde_json::from_str(&exercises_json)?,
            notes: row.get("notes"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}
