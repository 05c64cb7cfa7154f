// ABOUTME: Core data models for users, workout plans, and workout logs
// ABOUTME: Defines the entities persisted by the database layer and exposed via REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! Data models for the AlterFit coaching domain
//!
//! A [`User`] is either a trainer or a client; clients carry the gamification
//! fields (`xp`, `level`, `rank`) that the progression engine recomputes on
//! every XP award. A [`WorkoutPlan`] is a trainer-authored weekly schedule of
//! exercise prescriptions. A [`WorkoutLog`] records what the client actually
//! lifted in one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Coaches clients, authors plans, manages the roster
    Trainer,
    /// Logs workouts against an assigned plan and earns XP
    Client,
}

impl UserRole {
    /// String form stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::Client => "client",
        }
    }

    /// Parse from the stored string, defaulting unknown values to `Client`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "trainer" => Self::Trainer,
            _ => Self::Client,
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account may log in and log workouts
    Active,
    /// Account retained but paused (e.g. lapsed client)
    Inactive,
}

impl UserStatus {
    /// String form stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parse from the stored string, defaulting unknown values to `Active`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            _ => Self::Active,
        }
    }
}

/// A trainer or client account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Email address (unique across all users)
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Bcrypt password hash (never serialized in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Trainer or client
    pub role: UserRole,
    /// Active or inactive
    pub status: UserStatus,
    /// Trainer this client belongs to (clients only)
    pub trainer_id: Option<Uuid>,
    /// Cumulative experience points, never decreases
    pub xp: i64,
    /// Level derived from XP; stored for display but recomputed on every award
    pub level: i64,
    /// Rank name derived from XP; stored for display but recomputed on every award
    pub rank: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new client account with zero progress
    #[must_use]
    pub fn new_client(email: String, password_hash: String, display_name: Option<String>) -> Self {
        Self::new(email, password_hash, display_name, UserRole::Client)
    }

    /// Create a new account with the given role
    #[must_use]
    pub fn new(
        email: String,
        password_hash: String,
        display_name: Option<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            role,
            status: UserStatus::Active,
            trainer_id: None,
            xp: 0,
            level: 1,
            rank: crate::progression::RANKS[0].name.to_owned(),
            created_at: now,
            last_active: now,
        }
    }
}

/// One exercise slot in a plan's weekly schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisePrescription {
    /// Exercise name (e.g. "Barbell Squat")
    pub name: String,
    /// Prescribed number of sets
    pub sets: u32,
    /// Prescribed rep scheme, free-form ("8-10", "AMRAP")
    pub reps: String,
    /// Target rating of perceived exertion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    /// Trainer notes for the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Weekly schedule: weekday name ("Monday") to prescribed exercises
pub type WeeklySchedule = HashMap<String, Vec<ExercisePrescription>>;

/// A trainer-authored workout plan assigned to one client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Unique identifier
    pub id: Uuid,
    /// Client the plan is assigned to
    pub client_id: Uuid,
    /// Trainer who authored the plan
    pub trainer_id: Uuid,
    /// Plan name (e.g. "Hypertrophy Block 1")
    pub name: String,
    /// Whether this is the client's current plan (one active plan per client)
    pub active: bool,
    /// Weekly schedule of prescriptions
    pub schedule: WeeklySchedule,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// One completed set within a logged exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEntry {
    /// Weight lifted
    pub weight: f64,
    /// Repetitions performed
    pub reps: u32,
    /// Rating of perceived exertion, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

/// All sets performed for one exercise in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// Exercise name
    pub name: String,
    /// Completed sets in order
    pub sets: Vec<SetEntry>,
}

/// A logged workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Unique identifier
    pub id: Uuid,
    /// Client who performed the session
    pub client_id: Uuid,
    /// When the session took place
    pub date: DateTime<Utc>,
    /// Weekday slot of the plan this session was logged against
    pub day: Option<String>,
    /// Whether the session was finished (only completed sessions award XP)
    pub completed: bool,
    /// Total training volume (sum of weight x reps across all sets)
    pub volume: i64,
    /// Per-exercise set details
    pub exercises: Vec<ExerciseLog>,
    /// Free-form session notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl WorkoutLog {
    /// Total volume implied by the logged sets (weight x reps, truncated)
    ///
    /// Used to backfill `volume` when the caller does not supply one.
    #[must_use]
    pub fn computed_volume(&self) -> i64 {
        let total: f64 = self
            .exercises
            .iter()
            .flat_map(|ex| ex.sets.iter())
            .map(|set| set.weight * f64::from(set.reps))
            .sum();
        if total.is_finite() && total > 0.0 {
            #[allow(clippy::cast_possible_truncation)]
            {
                total as i64
            }
        } else {
            0
        }
    }
}
