// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use membership_backend::config::{MockEnvironment, Settings};
use membership_backend::services::{GroupService, UserService};
use membership_backend::types::db::{group, user};
use membership_backend::types::internal::context::RequestContext;
use membership_backend::types::internal::AccessFlags;
use membership_backend::AppData;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings with a test secret plus the given overrides
pub fn test_settings(vars: &[(&str, &str)]) -> Settings {
    let env = MockEnvironment::empty()
        .with_var("DATABASE_URL", "sqlite::memory:")
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_vars(vars);
    Settings::from_env_provider(Arc::new(env)).expect("Failed to load test settings")
}

pub async fn setup_app_data(vars: &[(&str, &str)]) -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::init(db, test_settings(vars)))
}

/// App data, group service and user service sharing one database
pub async fn setup_services(vars: &[(&str, &str)]) -> (Arc<AppData>, GroupService, UserService) {
    let app_data = setup_app_data(vars).await;
    let group_service = GroupService::new(app_data.clone());
    let user_service = UserService::new(app_data.clone());
    (app_data, group_service, user_service)
}

pub fn admin_ctx() -> RequestContext {
    RequestContext::for_cli("test")
}

pub async fn create_user(user_service: &UserService, username: &str) -> user::Model {
    user_service
        .create_user(
            &admin_ctx(),
            &format!("sub-{}", username),
            username,
            &format!("{}@example.com", username),
            "",
            "",
        )
        .await
        .expect("Failed to create user")
}

pub async fn create_group(group_service: &GroupService, name: &str) -> group::Model {
    group_service
        .create_group(&admin_ctx(), name)
        .await
        .expect("Failed to create group")
        .group
}

/// Create a group whose extension grants `flags`
pub async fn create_group_with_flags(
    group_service: &GroupService,
    name: &str,
    flags: AccessFlags,
) -> group::Model {
    let group = create_group(group_service, name).await;
    group_service
        .save_extension(&admin_ctx(), group.id, "", flags)
        .await
        .expect("Failed to save group extension");
    group
}

pub async fn add_member(group_service: &GroupService, group_id: i32, user_id: &str) {
    group_service
        .add_member(&admin_ctx(), group_id, user_id)
        .await
        .expect("Failed to add member");
}

/// The flags currently stored on the user record
pub async fn stored_flags(user_service: &UserService, user_id: &str) -> AccessFlags {
    let user = user_service.get_user(user_id).await.expect("Failed to load user");
    AccessFlags::from(&user)
}
