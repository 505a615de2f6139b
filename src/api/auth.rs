use std::sync::Arc;

use poem::Request;
use poem_openapi::{auth::Bearer, SecurityScheme};

use crate::api::Api;
use crate::errors::internal::UserError;
use crate::errors::{ApiError, InternalError};
use crate::services::{TokenService, UserService};
use crate::types::db::user;
use crate::types::internal::context::RequestContext;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Resolves a bearer token to the local user making the request
///
/// The caller is provisioned from the token claims on every request, so a valid
/// token for an unknown subject creates the user. Inactive users are refused.
pub struct Authenticator {
    token_service: Arc<TokenService>,
    user_service: Arc<UserService>,
}

impl Api for Authenticator {}

impl Authenticator {
    pub fn new(token_service: Arc<TokenService>, user_service: Arc<UserService>) -> Self {
        Self {
            token_service,
            user_service,
        }
    }

    pub async fn authenticate(
        &self,
        req: &Request,
        auth: &BearerAuth,
    ) -> Result<(user::Model, RequestContext), ApiError> {
        let claims = self.token_service.validate_jwt(&auth.0.token)?;
        let user = self.user_service.provision(&claims).await?;

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "Refusing request from inactive user");
            return Err(InternalError::from(UserError::Inactive { user_id: user.id }).into());
        }

        let ctx = RequestContext::for_api(&user.id, claims, self.extract_ip_address(req));
        Ok((user, ctx))
    }

    /// Same as [`authenticate`](Self::authenticate), additionally requiring superuser status
    pub async fn authenticate_superuser(
        &self,
        req: &Request,
        auth: &BearerAuth,
    ) -> Result<(user::Model, RequestContext), ApiError> {
        let (user, ctx) = self.authenticate(req, auth).await?;
        if !user.is_superuser {
            tracing::debug!(user_id = %user.id, "Refusing admin request from non-superuser");
            return Err(ApiError::superuser_required());
        }
        Ok((user, ctx))
    }
}
