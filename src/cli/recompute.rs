use std::sync::Arc;

use crate::app_data::AppData;
use crate::services::GroupService;
use crate::types::internal::context::RequestContext;

/// Rewrite derived access flags for one group's members or for every user
///
/// Repairs flags left stale by membership changes made while membership
/// recomputation is disabled, or by edits made directly in the database.
pub async fn recompute_flags(
    app_data: Arc<AppData>,
    group_id: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("recompute");
    let group_service = GroupService::new(app_data);

    let recomputed = match group_id {
        Some(group_id) => {
            tracing::info!(group_id, "Recomputing access flags for group members");
            group_service.recompute_group(&ctx, group_id).await?
        }
        None => {
            tracing::info!("Recomputing access flags for every user");
            group_service.recompute_all(&ctx).await?
        }
    };

    for user in &recomputed {
        println!("{}  {}", user.user_id, user.flags);
    }
    println!("Recomputed access flags for {} user(s)", recomputed.len());

    Ok(())
}
