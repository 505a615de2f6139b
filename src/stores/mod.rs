// Stores layer - Data access and repository pattern
//
// Stores are stateless: every operation takes the connection to run on, so the
// same store works against the pool or inside a caller-owned transaction.
pub mod audit_store;
pub mod group_extension_store;
pub mod group_store;
pub mod profile_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use group_extension_store::GroupExtensionStore;
pub use group_store::GroupStore;
pub use profile_store::ProfileStore;
pub use user_store::UserStore;
