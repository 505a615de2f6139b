// API layer - HTTP endpoints
pub mod auth;
pub mod groups;
pub mod health;
pub mod users;

use std::net::IpAddr;
use std::sync::Arc;

use poem::{Request, Route};
use poem_openapi::OpenApiService;

use crate::app_data::AppData;
use crate::services::{GroupService, UserService};

pub use auth::{Authenticator, BearerAuth};
pub use groups::GroupApi;
pub use health::HealthApi;
pub use users::UserApi;

pub trait Api {
    fn extract_ip_address(&self, req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}

/// Build the HTTP application: the OpenAPI service under `/api` and Swagger UI under `/swagger`
pub fn build_app(app_data: Arc<AppData>) -> Route {
    let user_service = Arc::new(UserService::new(app_data.clone()));
    let group_service = Arc::new(GroupService::new(app_data.clone()));
    let authenticator = Arc::new(Authenticator::new(
        app_data.token_service.clone(),
        user_service.clone(),
    ));

    let health_api = HealthApi::new(app_data.settings.clone());
    let user_api = UserApi::new(user_service, authenticator.clone());
    let group_api = GroupApi::new(group_service, authenticator);

    let api_service = OpenApiService::new(
        (health_api, user_api, group_api),
        app_data.settings.site_name(),
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", app_data.settings.server_address()));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
