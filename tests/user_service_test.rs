mod common;

use common::*;
use membership_backend::errors::internal::UserError;
use membership_backend::errors::InternalError;
use membership_backend::services::TokenService;
use membership_backend::types::dto::user::UpdateProfileRequest;
use membership_backend::types::internal::auth::Claims;
use membership_backend::types::internal::AccessFlags;

fn claims(sub: &str, username: &str) -> Claims {
    Claims {
        email: Some(format!("{}@Example.ORG", username)),
        given_name: Some("Alice".to_string()),
        family_name: Some("Smith".to_string()),
        ..TokenService::claims_for(sub, Some(username), 3600)
    }
}

#[tokio::test]
async fn test_provision_creates_flagless_user_with_empty_profile() {
    let (app_data, _, user_service) = setup_services(&[]).await;

    let user = user_service.provision(&claims("sub-1", "Alice")).await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.pretty_username, "Alice");
    assert_eq!(user.email, "Alice@example.org");
    assert_eq!(user.full_name(), "Alice Smith");
    assert_eq!(AccessFlags::from(&user), AccessFlags::NONE);

    let profile = app_data.profile_store.find(&app_data.db, &user.id).await.unwrap();
    assert!(profile.is_some());

    let events = app_data
        .audit_store
        .events_for_target(&app_data.db, &format!("user:{}", user.id))
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "user_provisioned");
    assert_eq!(events[0].actor_id, "system:provision_user");
}

#[tokio::test]
async fn test_provision_again_refreshes_identity_only() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let first = user_service.provision(&claims("sub-1", "Alice")).await.unwrap();
    let staff = create_group_with_flags(&group_service, "Staff", AccessFlags::new(false, true, true)).await;
    add_member(&group_service, staff.id, &first.id).await;
    group_service.recompute_group(&admin_ctx(), staff.id).await.unwrap();

    let mut changed = claims("sub-1", "Renamed");
    changed.family_name = Some("Jones".to_string());
    let second = user_service.provision(&changed).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.username, "alice");
    assert_eq!(second.last_name, "Jones");
    assert_eq!(AccessFlags::from(&second), AccessFlags::new(false, true, true));
}

#[tokio::test]
async fn test_provision_truncates_long_names_for_new_users() {
    let (_, _, user_service) = setup_services(&[]).await;
    let mut long = claims("sub-1", "Alice");
    long.given_name = Some("G".repeat(60));

    let user = user_service.provision(&long).await.unwrap();

    assert_eq!(user.first_name, "G".repeat(50));
    assert_eq!(user.last_name, "Smith");
}

#[tokio::test]
async fn test_provision_truncates_long_names_for_known_users() {
    let (_, _, user_service) = setup_services(&[]).await;
    let first = user_service.provision(&claims("sub-1", "Alice")).await.unwrap();

    let mut long = claims("sub-1", "Alice");
    long.family_name = Some(format!("  {}", "F".repeat(75)));
    let second = user_service.provision(&long).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.last_name, "F".repeat(50));

    // Same claims again compare equal after truncation
    let third = user_service.provision(&long).await.unwrap();
    assert_eq!(third, second);
}

#[tokio::test]
async fn test_provision_without_username_is_rejected() {
    let (_, _, user_service) = setup_services(&[]).await;
    let claims = TokenService::claims_for("sub-1", None, 3600);

    assert!(matches!(
        user_service.provision(&claims).await,
        Err(InternalError::User(UserError::InvalidUsername { .. }))
    ));
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (_, _, user_service) = setup_services(&[]).await;
    create_user(&user_service, "alice").await;

    let result = user_service
        .create_user(&admin_ctx(), "another-subject", "ALICE", "", "", "")
        .await;

    assert!(matches!(
        result,
        Err(InternalError::User(UserError::DuplicateUsername { .. }))
    ));
}

#[tokio::test]
async fn test_list_users_pages_by_username() {
    let (_, _, user_service) = setup_services(&[("PAGINATION_SIZE", "2")]).await;
    for name in ["carol", "alice", "bob"] {
        create_user(&user_service, name).await;
    }

    let (page, count, limit, offset) = user_service.list_users(None, None).await.unwrap();
    let names: Vec<&str> = page.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!((count, limit, offset), (3, 2, 0));

    let (page, _, _, _) = user_service.list_users(Some(10), Some(2)).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].username, "carol");
}

#[tokio::test]
async fn test_update_profile_replaces_fields() {
    let (app_data, _, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;

    let profile = user_service
        .update_profile(
            &admin_ctx(),
            &user.id,
            UpdateProfileRequest {
                street_address: Some("Main street 1".to_string()),
                postal_code: Some("00100".to_string()),
                phone_number: Some("   ".to_string()),
                membership_years: vec![2022, 2023],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(profile.has_address());
    assert_eq!(profile.phone_number, None);
    assert_eq!(profile.membership_years(), vec![2022, 2023]);
    assert!(!profile.is_member);

    let stored = user_service.get_profile(&user.id).await.unwrap();
    assert_eq!(stored, profile);

    let details = user_service.get_user_details(&user.id).await.unwrap();
    assert_eq!(details.profile, Some(profile));
    assert!(details.group_ids.is_empty());

    let events = app_data
        .audit_store
        .events_for_target(&app_data.db, &format!("user:{}", user.id))
        .await
        .unwrap();
    assert!(events.iter().any(|e| e.event_type == "profile_updated"));
}

#[tokio::test]
async fn test_update_profile_for_unknown_user_is_not_found() {
    let (_, _, user_service) = setup_services(&[]).await;

    assert!(matches!(
        user_service
            .update_profile(&admin_ctx(), "nobody", UpdateProfileRequest::default())
            .await,
        Err(InternalError::User(UserError::UserNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_profile_updates_never_touch_access_flags() {
    let (_, group_service, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;
    let staff = create_group(&group_service, "Staff").await;
    add_member(&group_service, staff.id, &user.id).await;
    group_service
        .save_extension(&admin_ctx(), staff.id, "", AccessFlags::new(false, true, false))
        .await
        .unwrap();

    user_service
        .update_profile(&admin_ctx(), &user.id, UpdateProfileRequest::default())
        .await
        .unwrap();

    assert_eq!(stored_flags(&user_service, &user.id).await, AccessFlags::new(false, true, false));
}

#[tokio::test]
async fn test_profile_update_rejects_overlong_fields() {
    let (_, _, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;

    let result = user_service
        .update_profile(
            &admin_ctx(),
            &user.id,
            UpdateProfileRequest {
                country: Some("C".repeat(51)),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(InternalError::User(UserError::InvalidField { ref field, .. })) if field == "country"
    ));
    assert_eq!(user_service.get_profile(&user.id).await.unwrap().country, None);
}

#[tokio::test]
async fn test_member_status_survives_profile_edits() {
    let (app_data, _, user_service) = setup_services(&[]).await;
    let user = create_user(&user_service, "alice").await;

    let profile = user_service.set_member_status(&admin_ctx(), &user.id, true).await.unwrap();
    assert!(profile.is_member);

    let profile = user_service
        .update_profile(
            &admin_ctx(),
            &user.id,
            UpdateProfileRequest {
                country: Some("Finland".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(profile.is_member);
    assert_eq!(profile.country.as_deref(), Some("Finland"));

    let profile = user_service.set_member_status(&admin_ctx(), &user.id, false).await.unwrap();
    assert!(!profile.is_member);
    assert_eq!(profile.country.as_deref(), Some("Finland"));

    let events = app_data
        .audit_store
        .events_for_target(&app_data.db, &format!("user:{}", user.id))
        .await
        .unwrap();
    assert_eq!(
        events.iter().filter(|e| e.event_type == "member_status_changed").count(),
        2
    );
}

#[tokio::test]
async fn test_member_status_for_unknown_user_is_not_found() {
    let (_, _, user_service) = setup_services(&[]).await;

    assert!(matches!(
        user_service.set_member_status(&admin_ctx(), "nobody", true).await,
        Err(InternalError::User(UserError::UserNotFound { .. }))
    ));
}
