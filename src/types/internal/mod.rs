pub mod access_flags;
pub mod audit;
pub mod auth;
pub mod context;

pub use access_flags::AccessFlags;
