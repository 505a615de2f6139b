use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Subject identifier issued by the identity provider
    #[sea_orm(unique)]
    pub subject_id: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub pretty_username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    // Derived from group extensions, written only by the permission aggregator
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,

    pub date_joined: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_group::Entity")]
    UserGroup,
    #[sea_orm(has_one = "super::user_profile::Entity")]
    UserProfile,
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroup.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// First and last name separated by a space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }
}
