use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::stores::{AuditStore, GroupExtensionStore, GroupStore, UserStore};
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;
use crate::types::internal::AccessFlags;

/// Flags written onto one user by a recomputation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputedUser {
    pub user_id: String,
    pub flags: AccessFlags,
}

/// Keeps each user's derived access flags equal to the union of their groups' extensions
///
/// Invoked explicitly by the code paths that mutate groups; it has no listeners of
/// its own. Every call runs on the caller's connection, so when the caller holds a
/// transaction the recomputation commits or fails together with the triggering write.
/// Users are processed sequentially and rewritten unconditionally. Concurrent
/// recomputations of the same user are not serialized: the last write wins.
pub struct PermissionAggregator {
    user_store: Arc<UserStore>,
    group_store: Arc<GroupStore>,
    group_extension_store: Arc<GroupExtensionStore>,
    audit_store: Arc<AuditStore>,
}

impl PermissionAggregator {
    pub fn new(
        user_store: Arc<UserStore>,
        group_store: Arc<GroupStore>,
        group_extension_store: Arc<GroupExtensionStore>,
        audit_store: Arc<AuditStore>,
    ) -> Self {
        Self {
            user_store,
            group_store,
            group_extension_store,
            audit_store,
        }
    }

    /// Union of the extensions of every group the user currently belongs to
    ///
    /// A group without an extension grants nothing.
    pub async fn effective_flags(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<AccessFlags, InternalError> {
        let group_ids = self.group_store.group_ids_of_user(conn, user_id).await?;
        let extensions = self.group_extension_store.find_many(conn, &group_ids).await?;

        Ok(group_ids
            .iter()
            .map(|group_id| {
                AccessFlags::from_extension(extensions.iter().find(|e| e.group_id == *group_id))
            })
            .collect())
    }

    /// Recompute and persist the flags of a single user
    pub async fn recompute_user(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<AccessFlags, InternalError> {
        let flags = self.effective_flags(conn, user_id).await?;

        self.user_store.save_access_flags(conn, user_id, flags).await?;

        self.audit_store
            .write_event(
                conn,
                ctx,
                AuditEvent::new(EventType::AccessFlagsRecomputed, format!("user:{}", user_id))
                    .with_data("is_superuser", flags.is_superuser)
                    .with_data("is_staff", flags.is_staff)
                    .with_data("is_active", flags.is_active),
            )
            .await?;

        tracing::debug!(user_id = %user_id, flags = %flags, "Access flags recomputed");

        Ok(flags)
    }

    /// Recompute every current member of a group, in ascending user id order
    pub async fn recompute_group_members(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
        group_id: i32,
    ) -> Result<Vec<RecomputedUser>, InternalError> {
        let member_ids = self.group_store.member_ids(conn, group_id).await?;
        let recomputed = self.recompute_users(conn, ctx, member_ids).await?;

        tracing::info!(
            group_id,
            members = recomputed.len(),
            actor = %ctx.actor_id,
            "Recomputed access flags for group members"
        );

        Ok(recomputed)
    }

    /// Recompute every user; repairs flags left stale by membership changes
    pub async fn recompute_all(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
    ) -> Result<Vec<RecomputedUser>, InternalError> {
        let user_ids = self.user_store.list_ids(conn).await?;
        let recomputed = self.recompute_users(conn, ctx, user_ids).await?;

        tracing::info!(users = recomputed.len(), actor = %ctx.actor_id, "Recomputed access flags for all users");

        Ok(recomputed)
    }

    async fn recompute_users(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
        user_ids: Vec<String>,
    ) -> Result<Vec<RecomputedUser>, InternalError> {
        let mut recomputed = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            let flags = self.recompute_user(conn, ctx, &user_id).await?;
            recomputed.push(RecomputedUser { user_id, flags });
        }
        Ok(recomputed)
    }
}
