use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::api::{Authenticator, BearerAuth};
use crate::errors::ApiError;
use crate::services::UserService;
use crate::types::dto::user::{
    MemberStatusRequest, ProfileResponse, UpdateProfileRequest, UserDetailResponse, UserListResponse,
    UserResponse,
};

/// User and profile endpoints
pub struct UserApi {
    user_service: Arc<UserService>,
    authenticator: Arc<Authenticator>,
}

impl UserApi {
    pub fn new(user_service: Arc<UserService>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            user_service,
            authenticator,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// The authenticated user's own account
    Me,
    /// User administration
    Users,
}

#[OpenApi]
impl UserApi {
    /// Current user
    #[oai(path = "/users/me", method = "get", tag = "UserTags::Me")]
    async fn me(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserResponse>, ApiError> {
        let (user, _) = self.authenticator.authenticate(req, &auth).await?;
        Ok(Json(user.into()))
    }

    /// Current user's profile
    #[oai(path = "/users/me/profile", method = "get", tag = "UserTags::Me")]
    async fn my_profile(&self, req: &Request, auth: BearerAuth) -> Result<Json<ProfileResponse>, ApiError> {
        let (user, _) = self.authenticator.authenticate(req, &auth).await?;
        let profile = self.user_service.get_profile(&user.id).await?;
        Ok(Json(profile.into()))
    }

    /// Replace the current user's profile
    #[oai(path = "/users/me/profile", method = "put", tag = "UserTags::Me")]
    async fn update_my_profile(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<ProfileResponse>, ApiError> {
        let (user, ctx) = self.authenticator.authenticate(req, &auth).await?;
        let profile = self.user_service.update_profile(&ctx, &user.id, body.0).await?;
        Ok(Json(profile.into()))
    }

    /// List users ordered by username
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        req: &Request,
        auth: BearerAuth,
        limit: Query<Option<u64>>,
        offset: Query<Option<u64>>,
    ) -> Result<Json<UserListResponse>, ApiError> {
        self.authenticator.authenticate_superuser(req, &auth).await?;
        let (users, count, limit, offset) = self.user_service.list_users(limit.0, offset.0).await?;
        Ok(Json(UserListResponse {
            count,
            limit,
            offset,
            results: users.into_iter().map(UserResponse::from).collect(),
        }))
    }

    /// User with profile and group ids
    #[oai(path = "/users/:user_id", method = "get", tag = "UserTags::Users")]
    async fn get_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        user_id: Path<String>,
    ) -> Result<Json<UserDetailResponse>, ApiError> {
        self.authenticator.authenticate_superuser(req, &auth).await?;
        let details = self.user_service.get_user_details(&user_id.0).await?;
        Ok(Json(UserDetailResponse {
            user: details.user.into(),
            profile: details.profile.map(ProfileResponse::from),
            group_ids: details.group_ids,
        }))
    }

    /// Grant or revoke a user's membership
    #[oai(path = "/users/:user_id/membership", method = "put", tag = "UserTags::Users")]
    async fn set_member_status(
        &self,
        req: &Request,
        auth: BearerAuth,
        user_id: Path<String>,
        body: Json<MemberStatusRequest>,
    ) -> Result<Json<ProfileResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        let profile = self
            .user_service
            .set_member_status(&ctx, &user_id.0, body.0.is_member)
            .await?;
        Ok(Json(profile.into()))
    }
}
