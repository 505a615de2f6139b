mod common;

use common::*;
use membership_backend::errors::internal::{GroupError, UserError};
use membership_backend::errors::InternalError;
use membership_backend::services::GroupService;
use membership_backend::types::db::{group_extension, user_group};
use membership_backend::types::internal::AccessFlags;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

#[tokio::test]
async fn test_extension_save_recomputes_only_group_members() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let member = create_user(&user_service, "member").await;
    let outsider = create_user(&user_service, "outsider").await;
    let crew = create_group_with_flags(&group_service, "Crew", AccessFlags::new(false, false, true)).await;
    let other = create_group_with_flags(&group_service, "Other", AccessFlags::new(false, true, false)).await;
    add_member(&group_service, crew.id, &member.id).await;
    add_member(&group_service, other.id, &outsider.id).await;
    group_service.recompute_group(&admin_ctx(), crew.id).await.unwrap();
    group_service.recompute_group(&admin_ctx(), other.id).await.unwrap();

    group_service
        .save_extension(&admin_ctx(), crew.id, "Crew", AccessFlags::new(true, false, true))
        .await
        .unwrap();

    assert_eq!(stored_flags(&user_service, &member.id).await, AccessFlags::new(true, false, true));
    assert_eq!(stored_flags(&user_service, &outsider.id).await, AccessFlags::new(false, true, false));
}

#[tokio::test]
async fn test_group_update_recomputes_members() {
    let (app_data, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let crew = create_group_with_flags(&group_service, "Crew", AccessFlags::new(false, true, true)).await;
    add_member(&group_service, crew.id, &user.id).await;
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::NONE);

    let details = group_service.update_group(&admin_ctx(), crew.id, "Event crew").await.unwrap();

    assert_eq!(details.group.name, "Event crew");
    assert_eq!(details.member_count, 1);
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(false, true, true));

    let events = app_data
        .audit_store
        .events_for_target(&app_data.db, &format!("group:{}", crew.id))
        .await
        .unwrap();
    assert!(events.iter().any(|e| e.event_type == "group_saved" && e.actor_id == "cli:test"));
}

#[tokio::test]
async fn test_membership_removal_leaves_flags_stale_by_default() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let admins = create_group(&group_service, "Admins").await;
    add_member(&group_service, admins.id, &user.id).await;
    group_service
        .save_extension(&admin_ctx(), admins.id, "", AccessFlags::new(true, true, true))
        .await
        .unwrap();
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(true, true, true));

    group_service.remove_member(&admin_ctx(), admins.id, &user.id).await.unwrap();

    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(true, true, true));
    let effective = group_service.recompute_group(&admin_ctx(), admins.id).await.unwrap();
    assert!(effective.is_empty());
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(true, true, true));
}

#[tokio::test]
async fn test_membership_add_does_not_recompute_by_default() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let staff = create_group_with_flags(&group_service, "Staff", AccessFlags::new(false, true, false)).await;

    add_member(&group_service, staff.id, &user.id).await;

    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::NONE);
}

#[tokio::test]
async fn test_membership_changes_recompute_when_enabled() {
    let (_, group_service, user_service) = setup_services(&[("RECOMPUTE_ON_MEMBERSHIP_CHANGE", "true")]).await;
    let user = create_user(&user_service, "alice").await;
    let staff = create_group_with_flags(&group_service, "Staff", AccessFlags::new(false, true, true)).await;

    add_member(&group_service, staff.id, &user.id).await;
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(false, true, true));

    group_service.remove_member(&admin_ctx(), staff.id, &user.id).await.unwrap();
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::NONE);
}

#[tokio::test]
async fn test_group_delete_recomputes_former_members_when_enabled() {
    let (_, group_service, user_service) = setup_services(&[("RECOMPUTE_ON_MEMBERSHIP_CHANGE", "true")]).await;
    let user = create_user(&user_service, "alice").await;
    let staff = create_group_with_flags(&group_service, "Staff", AccessFlags::new(false, true, false)).await;
    add_member(&group_service, staff.id, &user.id).await;

    let former = group_service.delete_group(&admin_ctx(), staff.id).await.unwrap();

    assert_eq!(former, vec![user.id.clone()]);
    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::NONE);
    assert!(matches!(
        group_service.get_group(staff.id).await,
        Err(InternalError::Group(GroupError::GroupNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_group_delete_keeps_flags_by_default() {
    let (app_data, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let staff = create_group(&group_service, "Staff").await;
    add_member(&group_service, staff.id, &user.id).await;
    group_service
        .save_extension(&admin_ctx(), staff.id, "", AccessFlags::new(false, true, false))
        .await
        .unwrap();

    group_service.delete_group(&admin_ctx(), staff.id).await.unwrap();

    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(false, true, false));
    let extension = group_extension::Entity::find_by_id(staff.id)
        .one(&app_data.db)
        .await
        .unwrap();
    assert!(extension.is_none());
}

#[tokio::test]
async fn test_failed_recomputation_rolls_back_extension_save() {
    let (app_data, group_service, _) = setup_services(&[]).await;
    let crew = create_group(&group_service, "Crew").await;

    // A membership pointing at a missing user makes the recomputation fail
    app_data
        .db
        .execute_unprepared("PRAGMA foreign_keys = OFF")
        .await
        .unwrap();
    user_group::ActiveModel {
        user_id: Set("missing-user".to_string()),
        group_id: Set(crew.id),
    }
    .insert(&app_data.db)
    .await
    .unwrap();

    let result = group_service
        .save_extension(&admin_ctx(), crew.id, "", AccessFlags::new(true, true, true))
        .await;

    assert!(matches!(
        result,
        Err(InternalError::User(UserError::UserNotFound { .. }))
    ));
    let details = group_service.get_group(crew.id).await.unwrap();
    assert!(details.extension.is_none());
}

#[tokio::test]
async fn test_add_member_is_idempotent() {
    let (app_data, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let crew = create_group(&group_service, "Crew").await;

    add_member(&group_service, crew.id, &user.id).await;
    add_member(&group_service, crew.id, &user.id).await;

    assert_eq!(group_service.get_group(crew.id).await.unwrap().member_count, 1);
    let events = app_data
        .audit_store
        .events_for_target(&app_data.db, &format!("group:{}", crew.id))
        .await
        .unwrap();
    assert_eq!(events.iter().filter(|e| e.event_type == "membership_added").count(), 1);
}

#[tokio::test]
async fn test_add_member_requires_existing_user_and_group() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let crew = create_group(&group_service, "Crew").await;

    assert!(matches!(
        group_service.add_member(&admin_ctx(), 999, &user.id).await,
        Err(InternalError::Group(GroupError::GroupNotFound { group_id: 999 }))
    ));
    assert!(matches!(
        group_service.add_member(&admin_ctx(), crew.id, "nobody").await,
        Err(InternalError::User(UserError::UserNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_remove_non_member_is_not_found() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let crew = create_group(&group_service, "Crew").await;

    assert!(matches!(
        group_service.remove_member(&admin_ctx(), crew.id, &user.id).await,
        Err(InternalError::Group(GroupError::NotAMember { .. }))
    ));
}

#[tokio::test]
async fn test_duplicate_group_name_is_rejected() {
    let (_, group_service, _) = setup_services(&[]).await;
    create_group(&group_service, "Crew").await;

    assert!(matches!(
        group_service.create_group(&admin_ctx(), "Crew").await,
        Err(InternalError::Group(GroupError::DuplicateName { .. }))
    ));
}

#[tokio::test]
async fn test_save_extension_for_unknown_group_is_not_found() {
    let (_, group_service, _) = setup_services(&[]).await;

    assert!(matches!(
        group_service
            .save_extension(&admin_ctx(), 42, "", AccessFlags::new(true, false, false))
            .await,
        Err(InternalError::Group(GroupError::GroupNotFound { group_id: 42 }))
    ));
}

#[tokio::test]
async fn test_list_groups_and_members() {
    let (app_data, group_service, user_service) = setup_services(&[]).await;
    let alice = create_user(&user_service, "alice").await;
    let bob = create_user(&user_service, "bob").await;
    let crew = create_group_with_flags(&group_service, "Crew", AccessFlags::new(false, true, false)).await;
    create_group(&group_service, "Admins").await;
    add_member(&group_service, crew.id, &alice.id).await;
    add_member(&group_service, crew.id, &bob.id).await;

    let groups = group_service.list_groups().await.unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.group.name.as_str()).collect();
    assert_eq!(names, vec!["Admins", "Crew"]);
    assert!(groups[0].extension.is_none());
    assert_eq!(groups[1].member_count, 2);

    let members = group_service.list_members(crew.id).await.unwrap();
    assert_eq!(members.len(), 2);

    let found = GroupService::new(app_data).find_group_by_name(" Crew ").await.unwrap();
    assert_eq!(found.map(|d| d.group.id), Some(crew.id));
}
