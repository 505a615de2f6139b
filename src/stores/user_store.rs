use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::AccessFlags;

/// Identity fields for a user that does not exist yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub subject_id: String,
    pub username: String,
    pub pretty_username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert a user with all access flags cleared
    pub async fn insert_user(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser,
    ) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let username = new_user.username.clone();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            subject_id: Set(new_user.subject_id),
            username: Set(new_user.username),
            pretty_username: Set(new_user.pretty_username),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            email: Set(new_user.email),
            is_superuser: Set(false),
            is_staff: Set(false),
            is_active: Set(false),
            date_joined: Set(now),
            updated_at: Set(now),
        };

        model.insert(conn).await.map_err(|e| {
            if InternalError::is_unique_violation(&e) {
                InternalError::User(UserError::DuplicateUsername { username })
            } else {
                InternalError::database("insert_user", e)
            }
        })
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        user::Entity::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))?
            .ok_or_else(|| {
                InternalError::User(UserError::UserNotFound {
                    user_id: user_id.to_string(),
                })
            })
    }

    pub async fn find_by_subject(
        &self,
        conn: &impl ConnectionTrait,
        subject_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::SubjectId.eq(subject_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_subject", e))
    }

    /// One page of users ordered by username, plus the total count
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<user::Model>, u64), InternalError> {
        let count = user::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))?;

        let users = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .limit(limit)
            .offset(offset)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))?;

        Ok((users, count))
    }

    /// Every user id in ascending order
    pub async fn list_ids(&self, conn: &impl ConnectionTrait) -> Result<Vec<String>, InternalError> {
        user::Entity::find()
            .select_only()
            .column(user::Column::Id)
            .order_by_asc(user::Column::Id)
            .into_tuple::<String>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_user_ids", e))
    }

    /// Refresh the name and contact fields taken from the identity provider
    pub async fn update_identity(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        first_name: String,
        last_name: String,
        email: String,
    ) -> Result<user::Model, InternalError> {
        let model = user::ActiveModel {
            id: Set(user_id.to_string()),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(conn)
            .await
            .map_err(|e| Self::map_update_error("update_user_identity", user_id, e))
    }

    /// Persist derived access flags onto the user record
    ///
    /// Always writes, even when the stored flags already match.
    pub async fn save_access_flags(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        flags: AccessFlags,
    ) -> Result<user::Model, InternalError> {
        let model = user::ActiveModel {
            id: Set(user_id.to_string()),
            is_superuser: Set(flags.is_superuser),
            is_staff: Set(flags.is_staff),
            is_active: Set(flags.is_active),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(conn)
            .await
            .map_err(|e| Self::map_update_error("save_access_flags", user_id, e))
    }

    fn map_update_error(operation: &str, user_id: &str, e: DbErr) -> InternalError {
        match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
                InternalError::User(UserError::UserNotFound {
                    user_id: user_id.to_string(),
                })
            }
            other => InternalError::database(operation, other),
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
