use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: i32 },

    #[error("Group already exists: {name}")]
    DuplicateName { name: String },

    #[error("Invalid group: {reason}")]
    Invalid { reason: String },

    #[error("User {user_id} is not a member of group {group_id}")]
    NotAMember { group_id: i32, user_id: String },
}
