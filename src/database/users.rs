// ABOUTME: User management database operations
// ABOUTME: Handles account CRUD, trainer rosters, and atomic XP award persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole, UserStatus};
use crate::progression::{self, LevelUpEvent};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;
use uuid::Uuid;

impl Database {
    /// Create or update a user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already in use by another user
    /// - Database operation fails
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        let existing = self.get_user_by_email(&user.email).await?;
        if let Some(existing_user) = existing {
            if existing_user.id != user.id {
                return Err(AppError::invalid_input(
                    "Email already in use by another user",
                ));
            }
            sqlx::query(
                r"
                UPDATE users SET
                    display_name = $2,
                    password_hash = $3,
                    role = $4,
                    status = $5,
                    trainer_id = $6,
                    last_active = CURRENT_TIMESTAMP
                WHERE id = $1
                ",
            )
            .bind(user.id.to_string())
            .bind(&user.display_name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(user.trainer_id.map(|id| id.to_string()))
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update user: {e}")))?;
        } else {
            sqlx::query(
                r"
                INSERT INTO users (
                    id, email, display_name, password_hash, role, status,
                    trainer_id, xp, level, rank, created_at, last_active
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ",
            )
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.display_name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.status.as_str())
            .bind(user.trainer_id.map(|id| id.to_string()))
            .bind(user.xp)
            .bind(user.level)
            .bind(&user.rank)
            .bind(user.created_at)
            .bind(user.last_active)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;
        }

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user_id_str = user_id.to_string();
        self.get_user_by_field("id", &user_id_str).await
    }

    /// Get a user by ID, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the query fails
    pub async fn get_user_required(&self, user_id: Uuid) -> AppResult<User> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with ID: {user_id}")))
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_user_by_field("email", email).await
    }

    /// Get a user by email, returning an error if not found
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the query fails
    pub async fn get_user_by_email_required(&self, email: &str) -> AppResult<User> {
        self.get_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with email: {email}")))
    }

    /// Internal implementation for getting a user
    async fn get_user_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            r"
            SELECT id, email, display_name, password_hash, role, status,
                   trainer_id, xp, level, rank, created_at, last_active
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by {field}: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Convert a database row to a User struct
    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");
        let role_str: String = row.get("role");
        let status_str: String = row.get("status");
        let trainer_id: Option<String> = row.get("trainer_id");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id UUID: {e}")))?,
            email: row.get("email"),
            display_name: row.get("display_name"),
            password_hash: row.get("password_hash"),
            role: UserRole::from_str_lossy(&role_str),
            status: UserStatus::from_str_lossy(&status_str),
            trainer_id: trainer_id.and_then(|id_str| {
                Uuid::parse_str(&id_str)
                    .inspect_err(|e| {
                        warn!(
                            user_id = %id,
                            trainer_id_str = %id_str,
                            error = %e,
                            "Invalid trainer_id UUID in database - setting to None"
                        );
                    })
                    .ok()
            }),
            xp: row.get("xp"),
            level: row.get("level"),
            rank: row.get("rank"),
            created_at: row.get("created_at"),
            last_active: row.get("last_active"),
        })
    }

    /// List all clients assigned to a trainer, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_clients(&self, trainer_id: Uuid) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT id, email, display_name, password_hash, role, status,
                   trainer_id, xp, level, rank, created_at, last_active
            FROM users
            WHERE trainer_id = $1 AND role = 'client'
            ORDER BY created_at DESC
            ",
        )
        .bind(trainer_id.to_string())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list clients: {e}")))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Update a user's display name and status
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the update fails
    pub async fn update_user_profile(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        status: Option<UserStatus>,
    ) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                display_name = COALESCE($1, display_name),
                status = COALESCE($2, status),
                last_active = CURRENT_TIMESTAMP
            WHERE id = $3
            ",
        )
        .bind(display_name)
        .bind(status.map(UserStatus::as_str))
        .bind(user_id.to_string())
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update user profile: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User with ID: {user_id}")));
        }

        self.get_user_required(user_id).await
    }

    /// Assign a client to a trainer
    ///
    /// # Errors
    ///
    /// Returns an error if the client is not found or the update fails
    pub async fn assign_trainer(&self, client_id: Uuid, trainer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET trainer_id = $1 WHERE id = $2")
            .bind(trainer_id.to_string())
            .bind(client_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to assign trainer: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User with ID: {client_id}")));
        }
        Ok(())
    }

    /// Update user's last active timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_last_active(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_active = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(user_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to update last active: {e}")))?;
        Ok(())
    }

    /// Get total user count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user count: {e}")))?;
        Ok(count)
    }

    /// Delete a user and all associated data
    ///
    /// Related plans and logs are removed via foreign key CASCADE constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is not found or the delete fails
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete user: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }

    /// Apply an XP award to a user's profile atomically
    ///
    /// The increment runs as a single `UPDATE ... RETURNING` statement inside
    /// a transaction, so two concurrent awards to the same profile both land
    /// (no lost update from a stale read). Level and rank are recomputed
    /// fresh from the resulting XP total in the same transaction, never
    /// incremented.
    ///
    /// Returns the updated user and the level-up event, if the award crossed
    /// a level boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is negative
    /// - The user is not found
    /// - A database operation fails
    pub async fn award_workout_xp(
        &self,
        user_id: Uuid,
        amount: i64,
    ) -> AppResult<(User, Option<LevelUpEvent>)> {
        if amount < 0 {
            return Err(AppError::invalid_input(format!(
                "XP award must be non-negative, got {amount}"
            )));
        }

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let new_xp: Option<i64> = sqlx::query_scalar(
            r"
            UPDATE users SET
                xp = xp + $1,
                last_active = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING xp
            ",
        )
        .bind(amount)
        .bind(user_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to award XP: {e}")))?;

        let Some(new_xp) = new_xp else {
            return Err(AppError::not_found(format!("User with ID: {user_id}")));
        };

        // Replay the award against the total this transaction observed so the
        // event reflects exactly the boundary this award crossed.
        let award = progression::award_xp(new_xp - amount, amount)?;
        let level = progression::compute_level(new_xp)?;
        let rank = progression::compute_rank(new_xp)?;

        sqlx::query("UPDATE users SET level = $1, rank = $2 WHERE id = $3")
            .bind(level)
            .bind(rank.name)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to store recomputed progress: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit XP award: {e}")))?;

        let user = self.get_user_required(user_id).await?;
        Ok((user, award.event))
    }
}
