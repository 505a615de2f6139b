use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::internal::GroupError;
use crate::errors::InternalError;
use crate::services::permission_aggregator::{PermissionAggregator, RecomputedUser};
use crate::stores::{AuditStore, GroupExtensionStore, GroupStore, UserStore};
use crate::types::db::{group, group_extension, user};
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;
use crate::types::internal::AccessFlags;

const MAX_GROUP_NAME_LENGTH: usize = 150;
const MAX_DESCRIPTION_LENGTH: usize = 50;

/// A group with its optional extension and current member count
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDetails {
    pub group: group::Model,
    pub extension: Option<group_extension::Model>,
    pub member_count: u64,
}

/// The only writer of groups, group extensions and memberships
///
/// Saving a group or its extension recomputes the access flags of every current
/// member through the injected aggregator, inside the same transaction as the save.
/// Membership changes and deletions recompute the affected users only when
/// `recompute_on_membership_change` is enabled; otherwise their flags stay as they
/// were until the next group save or an explicit recomputation.
pub struct GroupService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    group_store: Arc<GroupStore>,
    group_extension_store: Arc<GroupExtensionStore>,
    audit_store: Arc<AuditStore>,
    aggregator: Arc<PermissionAggregator>,
    recompute_on_membership_change: bool,
}

impl GroupService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            group_store: app_data.group_store.clone(),
            group_extension_store: app_data.group_extension_store.clone(),
            audit_store: app_data.audit_store.clone(),
            aggregator: app_data.permission_aggregator.clone(),
            recompute_on_membership_change: app_data.settings.recompute_on_membership_change(),
        }
    }

    pub async fn create_group(&self, ctx: &RequestContext, name: &str) -> Result<GroupDetails, InternalError> {
        let name = validate_group_name(name)?;

        let txn = begin_transaction(&self.db).await?;
        let group = self.group_store.insert(&txn, &name).await?;
        self.audit_group_saved(&txn, ctx, &group).await?;
        self.aggregator.recompute_group_members(&txn, ctx, group.id).await?;
        let details = self.details(&txn, group).await?;
        commit_transaction(txn).await?;

        tracing::info!(group_id = details.group.id, name = %details.group.name, "Group created");
        Ok(details)
    }

    pub async fn update_group(
        &self,
        ctx: &RequestContext,
        group_id: i32,
        name: &str,
    ) -> Result<GroupDetails, InternalError> {
        let name = validate_group_name(name)?;

        let txn = begin_transaction(&self.db).await?;
        let group = self.group_store.rename(&txn, group_id, &name).await?;
        self.audit_group_saved(&txn, ctx, &group).await?;
        self.aggregator.recompute_group_members(&txn, ctx, group.id).await?;
        let details = self.details(&txn, group).await?;
        commit_transaction(txn).await?;

        tracing::info!(group_id, name = %details.group.name, "Group updated");
        Ok(details)
    }

    /// Delete a group with its extension and memberships
    ///
    /// Returns the ids of the former members.
    pub async fn delete_group(&self, ctx: &RequestContext, group_id: i32) -> Result<Vec<String>, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let group = self.group_store.get(&txn, group_id).await?;
        let former_members = self.group_store.member_ids(&txn, group_id).await?;

        self.group_extension_store.delete(&txn, group_id).await?;
        self.group_store.remove_all_members(&txn, group_id).await?;
        self.group_store.delete(&txn, group_id).await?;

        self.audit_store
            .write_event(
                &txn,
                ctx,
                AuditEvent::new(EventType::GroupDeleted, group_target(group_id))
                    .with_data("name", group.name.clone())
                    .with_data("former_members", former_members.len()),
            )
            .await?;

        if self.recompute_on_membership_change {
            for user_id in &former_members {
                self.aggregator.recompute_user(&txn, ctx, user_id).await?;
            }
        }
        commit_transaction(txn).await?;

        tracing::info!(group_id, name = %group.name, former_members = former_members.len(), "Group deleted");
        Ok(former_members)
    }

    /// Create or replace the extension of a group
    pub async fn save_extension(
        &self,
        ctx: &RequestContext,
        group_id: i32,
        description: &str,
        flags: AccessFlags,
    ) -> Result<GroupDetails, InternalError> {
        let description = description.trim();
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(GroupError::Invalid {
                reason: format!("description must be at most {} characters", MAX_DESCRIPTION_LENGTH),
            }
            .into());
        }

        let txn = begin_transaction(&self.db).await?;
        let group = self.group_store.get(&txn, group_id).await?;
        self.group_extension_store.upsert(&txn, group_id, description, flags).await?;

        self.audit_store
            .write_event(
                &txn,
                ctx,
                AuditEvent::new(EventType::GroupExtensionSaved, group_target(group_id))
                    .with_data("is_superuser", flags.is_superuser)
                    .with_data("is_staff", flags.is_staff)
                    .with_data("is_active", flags.is_active),
            )
            .await?;

        self.aggregator.recompute_group_members(&txn, ctx, group_id).await?;
        let details = self.details(&txn, group).await?;
        commit_transaction(txn).await?;

        tracing::info!(group_id, flags = %flags, "Group extension saved");
        Ok(details)
    }

    pub async fn get_group(&self, group_id: i32) -> Result<GroupDetails, InternalError> {
        let group = self.group_store.get(&self.db, group_id).await?;
        self.details(&self.db, group).await
    }

    pub async fn find_group_by_name(&self, name: &str) -> Result<Option<GroupDetails>, InternalError> {
        match self.group_store.find_by_name(&self.db, name.trim()).await? {
            Some(group) => Ok(Some(self.details(&self.db, group).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupDetails>, InternalError> {
        let groups = self.group_store.list(&self.db).await?;
        let mut details = Vec::with_capacity(groups.len());
        for group in groups {
            details.push(self.details(&self.db, group).await?);
        }
        Ok(details)
    }

    pub async fn list_members(&self, group_id: i32) -> Result<Vec<user::Model>, InternalError> {
        self.group_store.get(&self.db, group_id).await?;
        let member_ids = self.group_store.member_ids(&self.db, group_id).await?;

        let mut members = Vec::with_capacity(member_ids.len());
        for user_id in member_ids {
            members.push(self.user_store.get_by_id(&self.db, &user_id).await?);
        }
        Ok(members)
    }

    /// Add a user to a group; adding an existing member is a no-op
    pub async fn add_member(&self, ctx: &RequestContext, group_id: i32, user_id: &str) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.db).await?;
        self.group_store.get(&txn, group_id).await?;
        self.user_store.get_by_id(&txn, user_id).await?;

        let added = self.group_store.add_member(&txn, group_id, user_id).await?;
        if added {
            self.audit_store
                .write_event(
                    &txn,
                    ctx,
                    AuditEvent::new(EventType::MembershipAdded, group_target(group_id)).with_data("user_id", user_id),
                )
                .await?;

            if self.recompute_on_membership_change {
                self.aggregator.recompute_user(&txn, ctx, user_id).await?;
            }
        }
        commit_transaction(txn).await?;

        if added {
            tracing::info!(group_id, user_id = %user_id, "Member added to group");
        }
        Ok(())
    }

    pub async fn remove_member(&self, ctx: &RequestContext, group_id: i32, user_id: &str) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.db).await?;
        self.group_store.get(&txn, group_id).await?;

        if !self.group_store.remove_member(&txn, group_id, user_id).await? {
            return Err(GroupError::NotAMember {
                group_id,
                user_id: user_id.to_string(),
            }
            .into());
        }

        self.audit_store
            .write_event(
                &txn,
                ctx,
                AuditEvent::new(EventType::MembershipRemoved, group_target(group_id)).with_data("user_id", user_id),
            )
            .await?;

        if self.recompute_on_membership_change {
            self.aggregator.recompute_user(&txn, ctx, user_id).await?;
        } else {
            tracing::debug!(
                group_id,
                user_id = %user_id,
                "Membership removed without recomputation; access flags stay as they were"
            );
        }
        commit_transaction(txn).await?;

        tracing::info!(group_id, user_id = %user_id, "Member removed from group");
        Ok(())
    }

    /// Recompute the access flags of every current member on demand
    pub async fn recompute_group(
        &self,
        ctx: &RequestContext,
        group_id: i32,
    ) -> Result<Vec<RecomputedUser>, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        self.group_store.get(&txn, group_id).await?;
        let recomputed = self.aggregator.recompute_group_members(&txn, ctx, group_id).await?;
        commit_transaction(txn).await?;
        Ok(recomputed)
    }

    /// Recompute the access flags of every user
    pub async fn recompute_all(&self, ctx: &RequestContext) -> Result<Vec<RecomputedUser>, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let recomputed = self.aggregator.recompute_all(&txn, ctx).await?;
        commit_transaction(txn).await?;
        Ok(recomputed)
    }

    async fn details(&self, conn: &impl ConnectionTrait, group: group::Model) -> Result<GroupDetails, InternalError> {
        let extension = self.group_extension_store.find(conn, group.id).await?;
        let member_count = self.group_store.member_count(conn, group.id).await?;
        Ok(GroupDetails {
            group,
            extension,
            member_count,
        })
    }

    async fn audit_group_saved(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
        group: &group::Model,
    ) -> Result<(), InternalError> {
        self.audit_store
            .write_event(
                conn,
                ctx,
                AuditEvent::new(EventType::GroupSaved, group_target(group.id)).with_data("name", group.name.clone()),
            )
            .await
    }
}

fn group_target(group_id: i32) -> String {
    format!("group:{}", group_id)
}

fn validate_group_name(name: &str) -> Result<String, InternalError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GroupError::Invalid {
            reason: "name must not be empty".to_string(),
        }
        .into());
    }
    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(GroupError::Invalid {
            reason: format!("name must be at most {} characters", MAX_GROUP_NAME_LENGTH),
        }
        .into());
    }
    Ok(name.to_string())
}
