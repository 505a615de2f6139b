// Services layer - Business logic and orchestration
pub mod group_service;
pub mod permission_aggregator;
pub mod token_service;
pub mod user_service;

pub use group_service::{GroupDetails, GroupService};
pub use permission_aggregator::{PermissionAggregator, RecomputedUser};
pub use token_service::TokenService;
pub use user_service::{UserDetails, UserService};
