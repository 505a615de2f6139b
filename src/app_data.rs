use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::{PermissionAggregator, TokenService};
use crate::stores::{AuditStore, GroupExtensionStore, GroupStore, ProfileStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once and shared across services.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ stores (user, group, group extension, profile, audit)
///   ├─ permission_aggregator (Arc<PermissionAggregator>)
///   └─ token_service (Arc<TokenService>)
///   ↓ wrapped in Arc<AppData>
///   ├─ GroupService::new(app_data) → holds the aggregator and calls it explicitly
///   └─ UserService::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,
    pub user_store: Arc<UserStore>,
    pub group_store: Arc<GroupStore>,
    pub group_extension_store: Arc<GroupExtensionStore>,
    pub profile_store: Arc<ProfileStore>,
    pub audit_store: Arc<AuditStore>,
    pub permission_aggregator: Arc<PermissionAggregator>,
    pub token_service: Arc<TokenService>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection should be migrated before calling this.
    pub fn init(db: DatabaseConnection, settings: Settings) -> Self {
        tracing::info!("Initializing AppData...");

        let user_store = Arc::new(UserStore::new());
        let group_store = Arc::new(GroupStore::new());
        let group_extension_store = Arc::new(GroupExtensionStore::new());
        let profile_store = Arc::new(ProfileStore::new());
        let audit_store = Arc::new(AuditStore::new());

        let permission_aggregator = Arc::new(PermissionAggregator::new(
            user_store.clone(),
            group_store.clone(),
            group_extension_store.clone(),
            audit_store.clone(),
        ));

        let token_service = Arc::new(TokenService::new(settings.jwt_secret().to_string()));

        tracing::info!("AppData initialization complete");

        Self {
            db,
            settings: Arc::new(settings),
            user_store,
            group_store,
            group_extension_store,
            profile_store,
            audit_store,
            permission_aggregator,
            token_service,
        }
    }
}
