use std::sync::Arc;

use crate::app_data::AppData;
use crate::services::{GroupService, UserService};
use crate::types::internal::context::RequestContext;
use crate::types::internal::AccessFlags;

pub const DEFAULT_ADMIN_GROUP: &str = "Administrators";

/// Give a user every access flag through group membership
///
/// Creates the user and the group when they do not exist yet, so a fresh
/// installation gets its first superuser without touching the database by hand.
/// Running it again is harmless.
pub async fn bootstrap_superuser(
    app_data: Arc<AppData>,
    subject_id: &str,
    username: &str,
    email: &str,
    group_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("bootstrap");
    let user_service = UserService::new(app_data.clone());
    let group_service = GroupService::new(app_data);

    let user = match user_service.find_by_subject(subject_id).await? {
        Some(user) => user,
        None => {
            user_service
                .create_user(&ctx, subject_id, username, email, "", "")
                .await?
        }
    };

    let group = match group_service.find_group_by_name(group_name).await? {
        Some(details) => details.group,
        None => group_service.create_group(&ctx, group_name).await?.group,
    };

    group_service.add_member(&ctx, group.id, &user.id).await?;
    group_service
        .save_extension(&ctx, group.id, "Full access", AccessFlags::new(true, true, true))
        .await?;

    println!("User {} ({}) is a superuser through group {:?}", user.pretty_username, user.id, group.name);
    tracing::info!(user_id = %user.id, group_id = group.id, "Bootstrap completed");

    Ok(())
}
