use chrono::NaiveDate;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait};

use crate::errors::InternalError;
use crate::types::db::user_profile;

/// Replacement values for every self-editable profile field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub phone_number: Option<String>,
    pub membership_years: Option<String>,
}

pub struct ProfileStore {}

impl ProfileStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<user_profile::Model>, InternalError> {
        user_profile::Entity::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_profile", e))
    }

    /// Create or replace the profile of a user
    ///
    /// Membership status is kept as stored; a new profile starts as a non-member.
    pub async fn save(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        fields: ProfileFields,
    ) -> Result<user_profile::Model, InternalError> {
        let existing = self.find(conn, user_id).await?;

        let model = user_profile::ActiveModel {
            user_id: Set(user_id.to_string()),
            birth_date: Set(fields.birth_date),
            gender: Set(fields.gender),
            country: Set(fields.country),
            postal_code: Set(fields.postal_code),
            street_address: Set(fields.street_address),
            phone_number: Set(fields.phone_number),
            membership_years: Set(fields.membership_years),
            is_member: Set(existing.as_ref().is_some_and(|p| p.is_member)),
        };

        match existing {
            Some(_) => model
                .update(conn)
                .await
                .map_err(|e| InternalError::database("update_user_profile", e)),
            None => model
                .insert(conn)
                .await
                .map_err(|e| InternalError::database("insert_user_profile", e)),
        }
    }

    /// Set membership status, creating an empty profile when there is none
    pub async fn set_member_status(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        is_member: bool,
    ) -> Result<user_profile::Model, InternalError> {
        match self.find(conn, user_id).await? {
            Some(profile) => {
                let mut model: user_profile::ActiveModel = profile.into();
                model.is_member = Set(is_member);
                model
                    .update(conn)
                    .await
                    .map_err(|e| InternalError::database("update_member_status", e))
            }
            None => {
                user_profile::ActiveModel {
                    user_id: Set(user_id.to_string()),
                    is_member: Set(is_member),
                    ..Default::default()
                }
                .insert(conn)
                .await
                .map_err(|e| InternalError::database("insert_member_status", e))
            }
        }
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
