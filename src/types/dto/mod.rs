// Data transfer objects exposed by the API
pub mod common;
pub mod group;
pub mod user;
