use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::errors::InternalError;
use crate::types::db::group_extension;
use crate::types::internal::AccessFlags;

pub struct GroupExtensionStore {}

impl GroupExtensionStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Extension of a group, or None when the group has none
    pub async fn find(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
    ) -> Result<Option<group_extension::Model>, InternalError> {
        group_extension::Entity::find_by_id(group_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_group_extension", e))
    }

    /// Extensions of the given groups; groups without one are simply absent
    pub async fn find_many(
        &self,
        conn: &impl ConnectionTrait,
        group_ids: &[i32],
    ) -> Result<Vec<group_extension::Model>, InternalError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        group_extension::Entity::find()
            .filter(group_extension::Column::GroupId.is_in(group_ids.iter().copied()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_group_extensions", e))
    }

    /// Create or replace the extension of a group
    pub async fn upsert(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
        description: &str,
        flags: AccessFlags,
    ) -> Result<group_extension::Model, InternalError> {
        let existing = self.find(conn, group_id).await?;

        let model = group_extension::ActiveModel {
            group_id: Set(group_id),
            description: Set(description.to_string()),
            is_superuser: Set(flags.is_superuser),
            is_staff: Set(flags.is_staff),
            is_active: Set(flags.is_active),
        };

        match existing {
            Some(_) => model
                .update(conn)
                .await
                .map_err(|e| InternalError::database("update_group_extension", e)),
            None => model
                .insert(conn)
                .await
                .map_err(|e| InternalError::database("insert_group_extension", e)),
        }
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, group_id: i32) -> Result<(), InternalError> {
        group_extension::Entity::delete_by_id(group_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_group_extension", e))?;
        Ok(())
    }
}

impl Default for GroupExtensionStore {
    fn default() -> Self {
        Self::new()
    }
}
