use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::errors::internal::GroupError;
use crate::errors::InternalError;
use crate::types::db::{group, user_group};

/// Groups and the membership relation between users and groups
pub struct GroupStore {}

impl GroupStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<group::Model, InternalError> {
        let model = group::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| Self::map_write_error("insert_group", name, e))
    }

    pub async fn get(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
    ) -> Result<group::Model, InternalError> {
        group::Entity::find_by_id(group_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_group", e))?
            .ok_or_else(|| InternalError::Group(GroupError::GroupNotFound { group_id }))
    }

    pub async fn find_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<group::Model>, InternalError> {
        group::Entity::find()
            .filter(group::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_group_by_name", e))
    }

    pub async fn rename(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
        name: &str,
    ) -> Result<group::Model, InternalError> {
        let mut model: group::ActiveModel = self.get(conn, group_id).await?.into();
        model.name = Set(name.to_string());

        model
            .update(conn)
            .await
            .map_err(|e| Self::map_write_error("rename_group", name, e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, group_id: i32) -> Result<(), InternalError> {
        let result = group::Entity::delete_by_id(group_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_group", e))?;

        if result.rows_affected == 0 {
            return Err(InternalError::Group(GroupError::GroupNotFound { group_id }));
        }
        Ok(())
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<group::Model>, InternalError> {
        group::Entity::find()
            .order_by_asc(group::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_groups", e))
    }

    /// Current members of a group in ascending user id order
    pub async fn member_ids(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
    ) -> Result<Vec<String>, InternalError> {
        user_group::Entity::find()
            .select_only()
            .column(user_group::Column::UserId)
            .filter(user_group::Column::GroupId.eq(group_id))
            .order_by_asc(user_group::Column::UserId)
            .into_tuple::<String>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_group_members", e))
    }

    pub async fn member_count(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
    ) -> Result<u64, InternalError> {
        user_group::Entity::find()
            .filter(user_group::Column::GroupId.eq(group_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_group_members", e))
    }

    /// Every group the user currently belongs to
    pub async fn group_ids_of_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Vec<i32>, InternalError> {
        user_group::Entity::find()
            .select_only()
            .column(user_group::Column::GroupId)
            .filter(user_group::Column::UserId.eq(user_id))
            .order_by_asc(user_group::Column::GroupId)
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_user_groups", e))
    }

    /// Add a membership; returns false when it already existed
    pub async fn add_member(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
        user_id: &str,
    ) -> Result<bool, InternalError> {
        let existing = user_group::Entity::find_by_id((user_id.to_string(), group_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_membership", e))?;

        if existing.is_some() {
            return Ok(false);
        }

        user_group::ActiveModel {
            user_id: Set(user_id.to_string()),
            group_id: Set(group_id),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("add_membership", e))?;

        Ok(true)
    }

    /// Remove a membership; returns false when there was none
    pub async fn remove_member(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
        user_id: &str,
    ) -> Result<bool, InternalError> {
        let result = user_group::Entity::delete_by_id((user_id.to_string(), group_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("remove_membership", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove_all_members(
        &self,
        conn: &impl ConnectionTrait,
        group_id: i32,
    ) -> Result<u64, InternalError> {
        let result = user_group::Entity::delete_many()
            .filter(user_group::Column::GroupId.eq(group_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("remove_group_memberships", e))?;

        Ok(result.rows_affected)
    }

    fn map_write_error(operation: &str, name: &str, e: sea_orm::DbErr) -> InternalError {
        if InternalError::is_unique_violation(&e) {
            InternalError::Group(GroupError::DuplicateName {
                name: name.to_string(),
            })
        } else {
            InternalError::database(operation, e)
        }
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}
