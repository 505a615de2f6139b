use poem_openapi::Object;

use crate::types::db::{group, group_extension};
use crate::types::internal::AccessFlags;

#[derive(Object, Debug)]
pub struct GroupRequest {
    #[oai(validator(min_length = 1, max_length = 150))]
    pub name: String,
}

#[derive(Object, Debug, Clone)]
pub struct GroupExtensionRequest {
    #[oai(default, validator(max_length = 50))]
    pub description: String,
    #[oai(default)]
    pub is_superuser: bool,
    #[oai(default)]
    pub is_staff: bool,
    #[oai(default)]
    pub is_active: bool,
}

impl GroupExtensionRequest {
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::new(self.is_superuser, self.is_staff, self.is_active)
    }
}

#[derive(Object, Debug)]
pub struct GroupExtensionResponse {
    pub description: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<group_extension::Model> for GroupExtensionResponse {
    fn from(e: group_extension::Model) -> Self {
        Self {
            description: e.description,
            is_superuser: e.is_superuser,
            is_staff: e.is_staff,
            is_active: e.is_active,
        }
    }
}

#[derive(Object, Debug)]
pub struct GroupResponse {
    pub id: i32,
    pub name: String,
    /// Absent when the group grants nothing
    pub extension: Option<GroupExtensionResponse>,
    pub member_count: u64,
}

impl GroupResponse {
    pub fn new(group: group::Model, extension: Option<group_extension::Model>, member_count: u64) -> Self {
        Self {
            id: group.id,
            name: group.name,
            extension: extension.map(GroupExtensionResponse::from),
            member_count,
        }
    }
}

#[derive(Object, Debug)]
pub struct AddMemberRequest {
    pub user_id: String,
}

/// Flags written onto one user by a recomputation
#[derive(Object, Debug)]
pub struct RecomputedUserResponse {
    pub user_id: String,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
}

#[derive(Object, Debug)]
pub struct RecomputeResponse {
    pub group_id: i32,
    pub users: Vec<RecomputedUserResponse>,
}

#[derive(Object, Debug)]
pub struct MembershipResponse {
    pub group_id: i32,
    pub user_id: String,
}

#[derive(Object, Debug)]
pub struct DeleteGroupResponse {
    pub group_id: i32,
    /// Former members; their access flags are left as they were unless membership recomputation is enabled
    pub former_members: Vec<String>,
}
