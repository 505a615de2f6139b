// Database entities - SeaORM models
pub mod audit_event;
pub mod group;
pub mod group_extension;
pub mod user;
pub mod user_group;
pub mod user_profile;
