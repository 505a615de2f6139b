use chrono::NaiveDate;
use poem_openapi::Object;

use crate::types::db::{user, user_profile};

/// User as returned by the API
///
/// The access flags are read-only: they are derived from the user's groups.
#[derive(Object, Debug)]
pub struct UserResponse {
    pub id: String,
    pub subject_id: String,
    pub username: String,
    pub pretty_username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    /// Unix timestamp
    pub date_joined: i64,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        let full_name = u.full_name();
        Self {
            id: u.id,
            subject_id: u.subject_id,
            username: u.username,
            pretty_username: u.pretty_username,
            first_name: u.first_name,
            last_name: u.last_name,
            full_name,
            email: u.email,
            is_superuser: u.is_superuser,
            is_staff: u.is_staff,
            is_active: u.is_active,
            date_joined: u.date_joined,
        }
    }
}

/// A page of users
#[derive(Object, Debug)]
pub struct UserListResponse {
    pub count: u64,
    pub limit: u64,
    pub offset: u64,
    pub results: Vec<UserResponse>,
}

#[derive(Object, Debug)]
pub struct ProfileResponse {
    pub user_id: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub phone_number: Option<String>,
    pub membership_years: Vec<i32>,
    pub is_member: bool,
    pub has_address: bool,
}

impl From<user_profile::Model> for ProfileResponse {
    fn from(p: user_profile::Model) -> Self {
        let membership_years = p.membership_years();
        let has_address = p.has_address();
        Self {
            user_id: p.user_id,
            birth_date: p.birth_date,
            gender: p.gender,
            country: p.country,
            postal_code: p.postal_code,
            street_address: p.street_address,
            phone_number: p.phone_number,
            membership_years,
            is_member: p.is_member,
            has_address,
        }
    }
}

/// Profile update; every field replaces the stored value
///
/// Membership status is not part of it, see [`MemberStatusRequest`].
#[derive(Object, Debug, Default, Clone)]
pub struct UpdateProfileRequest {
    pub birth_date: Option<NaiveDate>,
    #[oai(validator(max_length = 50))]
    pub gender: Option<String>,
    #[oai(validator(max_length = 50))]
    pub country: Option<String>,
    #[oai(validator(max_length = 10))]
    pub postal_code: Option<String>,
    #[oai(validator(max_length = 100))]
    pub street_address: Option<String>,
    #[oai(validator(max_length = 20))]
    pub phone_number: Option<String>,
    #[oai(default)]
    pub membership_years: Vec<i32>,
}

/// Whether the user currently holds a membership; set by administrators only
#[derive(Object, Debug)]
pub struct MemberStatusRequest {
    pub is_member: bool,
}

/// User together with its profile
#[derive(Object, Debug)]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub profile: Option<ProfileResponse>,
    pub group_ids: Vec<i32>,
}
