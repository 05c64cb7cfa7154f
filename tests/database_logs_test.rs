// ABOUTME: Integration tests for workout log persistence
// ABOUTME: Covers log CRUD, exercise JSON round trips, and completion updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use alterfit_server::models::{ExerciseLog, SetEntry, User, WorkoutLog};
use chrono::{Duration, Utc};
use common::{create_test_client, create_test_resources};
use uuid::Uuid;

fn make_log(client: &User, completed: bool, volume: i64) -> WorkoutLog {
    let now = Utc::now();
    WorkoutLog {
        id: Uuid::new_v4(),
        client_id: client.id,
        date: now,
        day: Some("monday".to_owned()),
        completed,
        volume,
        exercises: vec![ExerciseLog {
            name: "Bench Press".to_owned(),
            sets: vec![
                SetEntry {
                    weight: 80.0,
                    reps: 5,
                    rpe: Some(7.5),
                },
                SetEntry {
                    weight: 80.0,
                    reps: 5,
                    rpe: Some(8.0),
                },
            ],
        }],
        notes: Some("Felt strong".to_owned()),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_create_and_get_log() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let log = make_log(&client, true, 800);
    resources.database.create_log(&log).await.unwrap();

    let fetched = resources.database.get_log_required(log.id).await.unwrap();
    assert_eq!(fetched.client_id, client.id);
    assert!(fetched.completed);
    assert_eq!(fetched.volume, 800);
    assert_eq!(fetched.day.as_deref(), Some("monday"));
    assert_eq!(fetched.exercises.len(), 1);
    assert_eq!(fetched.exercises[0].name, "Bench Press");
    assert_eq!(fetched.exercises[0].sets.len(), 2);
    assert_eq!(fetched.exercises[0].sets[1].rpe, Some(8.0));
}

#[tokio::test]
async fn test_list_logs_newest_first() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();
    let other = create_test_client(&resources, None).await.unwrap();

    let mut older = make_log(&client, true, 100);
    older.date = Utc::now() - Duration::days(2);
    resources.database.create_log(&older).await.unwrap();

    let newer = make_log(&client, false, 200);
    resources.database.create_log(&newer).await.unwrap();

    let unrelated = make_log(&other, true, 300);
    resources.database.create_log(&unrelated).await.unwrap();

    let logs = resources.database.list_logs(client.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].id, newer.id);
    assert_eq!(logs[1].id, older.id);
}

#[tokio::test]
async fn test_update_log_completion_and_volume() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let log = make_log(&client, false, 0);
    resources.database.create_log(&log).await.unwrap();

    let updated = resources
        .database
        .update_log(log.id, Some(true), Some(800), None, Some("Done"))
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.volume, 800);
    assert_eq!(updated.notes.as_deref(), Some("Done"));
    // Exercises untouched by a partial update
    assert_eq!(updated.exercises.len(), 1);
}

#[tokio::test]
async fn test_update_missing_log_not_found() {
    let resources = create_test_resources().await.unwrap();
    let result = resources
        .database
        .update_log(Uuid::new_v4(), Some(true), None, None, None)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_delete_log() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let log = make_log(&client, true, 500);
    resources.database.create_log(&log).await.unwrap();
    resources.database.delete_log(log.id).await.unwrap();

    assert!(resources.database.get_log(log.id).await.unwrap().is_none());
}
