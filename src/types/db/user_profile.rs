use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub phone_number: Option<String>,
    /// Comma separated list of years the user has been a member
    pub membership_years: Option<String>,
    pub is_member: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn has_address(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.street_address) && filled(&self.postal_code)
    }

    /// Parsed membership years, skipping blank entries
    pub fn membership_years(&self) -> Vec<i32> {
        self.membership_years
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|year| !year.is_empty())
            .filter_map(|year| year.parse().ok())
            .collect()
    }
}
