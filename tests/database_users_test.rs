// ABOUTME: Integration tests for user persistence and XP award semantics
// ABOUTME: Covers CRUD, trainer rosters, and atomic award level/rank recomputation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use alterfit_server::models::{UserRole, UserStatus};
use common::{create_test_client, create_test_resources, create_test_trainer};
use uuid::Uuid;

#[tokio::test]
async fn test_create_and_fetch_user() {
    let resources = create_test_resources().await.unwrap();
    let trainer = create_test_trainer(&resources).await.unwrap();

    let fetched = resources
        .database
        .get_user_required(trainer.id)
        .await
        .unwrap();
    assert_eq!(fetched.email, trainer.email);
    assert_eq!(fetched.role, UserRole::Trainer);
    assert_eq!(fetched.xp, 0);
    assert_eq!(fetched.level, 1);
    assert_eq!(fetched.rank, "Cadet");

    let by_email = resources
        .database
        .get_user_by_email_required(&trainer.email)
        .await
        .unwrap();
    assert_eq!(by_email.id, trainer.id);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let resources = create_test_resources().await.unwrap();
    let trainer = create_test_trainer(&resources).await.unwrap();

    let mut duplicate = create_test_client(&resources, None).await.unwrap();
    duplicate.email = trainer.email.clone();
    duplicate.id = Uuid::new_v4();
    let result = resources.database.create_user(&duplicate).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_clients_scoped_to_trainer() {
    let resources = create_test_resources().await.unwrap();
    let trainer = create_test_trainer(&resources).await.unwrap();
    let other_trainer = create_test_trainer(&resources).await.unwrap();

    let mine_a = create_test_client(&resources, Some(trainer.id)).await.unwrap();
    let mine_b = create_test_client(&resources, Some(trainer.id)).await.unwrap();
    let _unassigned = create_test_client(&resources, None).await.unwrap();
    let _theirs = create_test_client(&resources, Some(other_trainer.id))
        .await
        .unwrap();

    let roster = resources.database.list_clients(trainer.id).await.unwrap();
    assert_eq!(roster.len(), 2);
    let ids: Vec<Uuid> = roster.iter().map(|u| u.id).collect();
    assert!(ids.contains(&mine_a.id));
    assert!(ids.contains(&mine_b.id));
}

#[tokio::test]
async fn test_update_user_profile() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let updated = resources
        .database
        .update_user_profile(client.id, Some("Renamed"), Some(UserStatus::Inactive))
        .await
        .unwrap();
    assert_eq!(updated.display_name.as_deref(), Some("Renamed"));
    assert_eq!(updated.status, UserStatus::Inactive);

    // Omitted fields stay untouched
    let again = resources
        .database
        .update_user_profile(client.id, None, Some(UserStatus::Active))
        .await
        .unwrap();
    assert_eq!(again.display_name.as_deref(), Some("Renamed"));
    assert_eq!(again.status, UserStatus::Active);
}

#[tokio::test]
async fn test_assign_trainer() {
    let resources = create_test_resources().await.unwrap();
    let trainer = create_test_trainer(&resources).await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    resources
        .database
        .assign_trainer(client.id, trainer.id)
        .await
        .unwrap();
    let fetched = resources.database.get_user_required(client.id).await.unwrap();
    assert_eq!(fetched.trainer_id, Some(trainer.id));
}

#[tokio::test]
async fn test_delete_user() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    resources.database.delete_user(client.id).await.unwrap();
    assert!(resources
        .database
        .get_user(client.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_award_xp_updates_profile_without_event() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let (user, event) = resources
        .database
        .award_workout_xp(client.id, 250)
        .await
        .unwrap();
    assert_eq!(user.xp, 250);
    assert_eq!(user.level, 1);
    assert_eq!(user.rank, "Cadet");
    assert!(event.is_none());
}

#[tokio::test]
async fn test_award_xp_level_up_with_rank_change() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let (user, event) = resources
        .database
        .award_workout_xp(client.id, 550)
        .await
        .unwrap();
    assert_eq!(user.xp, 550);
    assert_eq!(user.level, 2);
    assert_eq!(user.rank, "Trooper");

    let event = event.unwrap();
    assert_eq!(event.old_level, 1);
    assert_eq!(event.new_level, 2);
    assert_eq!(event.new_rank.unwrap().name, "Trooper");
}

#[tokio::test]
async fn test_award_xp_level_up_without_rank_change() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    // 1000 XP puts the client at level 3, rank Centurion
    resources
        .database
        .award_workout_xp(client.id, 1000)
        .await
        .unwrap();

    // +600 crosses into level 4 but stays short of Fedaykin (2500)
    let (user, event) = resources
        .database
        .award_workout_xp(client.id, 600)
        .await
        .unwrap();
    assert_eq!(user.xp, 1600);
    assert_eq!(user.level, 4);
    assert_eq!(user.rank, "Centurion");

    let event = event.unwrap();
    assert_eq!(event.new_level, 4);
    assert!(event.new_rank.is_none());
}

#[tokio::test]
async fn test_award_zero_is_a_no_op() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let (user, event) = resources
        .database
        .award_workout_xp(client.id, 0)
        .await
        .unwrap();
    assert_eq!(user.xp, 0);
    assert_eq!(user.level, 1);
    assert!(event.is_none());
}

#[tokio::test]
async fn test_award_negative_rejected() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    assert!(resources
        .database
        .award_workout_xp(client.id, -10)
        .await
        .is_err());
    let unchanged = resources.database.get_user_required(client.id).await.unwrap();
    assert_eq!(unchanged.xp, 0);
}

#[tokio::test]
async fn test_award_unknown_user_not_found() {
    let resources = create_test_resources().await.unwrap();
    assert!(resources
        .database
        .award_workout_xp(Uuid::new_v4(), 100)
        .await
        .is_err());
}

#[tokio::test]
async fn test_concurrent_awards_both_land() {
    let resources = create_test_resources().await.unwrap();
    let client = create_test_client(&resources, None).await.unwrap();

    let db_a = resources.database.clone();
    let db_b = resources.database.clone();
    let (a, b) = tokio::join!(
        db_a.award_workout_xp(client.id, 300),
        db_b.award_workout_xp(client.id, 300)
    );
    a.unwrap();
    b.unwrap();

    let user = resources.database.get_user_required(client.id).await.unwrap();
    assert_eq!(user.xp, 600);
    assert_eq!(user.level, 2);
    assert_eq!(user.rank, "Trooper");
}
