use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{Authenticator, BearerAuth};
use crate::errors::ApiError;
use crate::services::{GroupDetails, GroupService, RecomputedUser};
use crate::types::dto::group::{
    AddMemberRequest, DeleteGroupResponse, GroupExtensionRequest, GroupRequest, GroupResponse,
    MembershipResponse, RecomputeResponse, RecomputedUserResponse,
};
use crate::types::dto::user::UserResponse;

/// Group administration endpoints; every operation requires a superuser
pub struct GroupApi {
    group_service: Arc<GroupService>,
    authenticator: Arc<Authenticator>,
}

impl GroupApi {
    pub fn new(group_service: Arc<GroupService>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            group_service,
            authenticator,
        }
    }
}

#[derive(Tags)]
enum GroupTags {
    /// Groups and their access-granting extensions
    Groups,
    /// Group membership
    Members,
}

fn group_response(details: GroupDetails) -> GroupResponse {
    GroupResponse::new(details.group, details.extension, details.member_count)
}

fn recomputed_response(recomputed: RecomputedUser) -> RecomputedUserResponse {
    RecomputedUserResponse {
        user_id: recomputed.user_id,
        is_superuser: recomputed.flags.is_superuser,
        is_staff: recomputed.flags.is_staff,
        is_active: recomputed.flags.is_active,
    }
}

#[OpenApi]
impl GroupApi {
    #[oai(path = "/groups", method = "get", tag = "GroupTags::Groups")]
    async fn list_groups(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<GroupResponse>>, ApiError> {
        self.authenticator.authenticate_superuser(req, &auth).await?;
        let groups = self.group_service.list_groups().await?;
        Ok(Json(groups.into_iter().map(group_response).collect()))
    }

    #[oai(path = "/groups", method = "post", tag = "GroupTags::Groups")]
    async fn create_group(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<GroupRequest>,
    ) -> Result<Json<GroupResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        let details = self.group_service.create_group(&ctx, &body.name).await?;
        Ok(Json(group_response(details)))
    }

    #[oai(path = "/groups/:group_id", method = "get", tag = "GroupTags::Groups")]
    async fn get_group(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
    ) -> Result<Json<GroupResponse>, ApiError> {
        self.authenticator.authenticate_superuser(req, &auth).await?;
        let details = self.group_service.get_group(group_id.0).await?;
        Ok(Json(group_response(details)))
    }

    /// Rename a group; recomputes every member's access flags
    #[oai(path = "/groups/:group_id", method = "put", tag = "GroupTags::Groups")]
    async fn update_group(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
        body: Json<GroupRequest>,
    ) -> Result<Json<GroupResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        let details = self.group_service.update_group(&ctx, group_id.0, &body.name).await?;
        Ok(Json(group_response(details)))
    }

    #[oai(path = "/groups/:group_id", method = "delete", tag = "GroupTags::Groups")]
    async fn delete_group(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
    ) -> Result<Json<DeleteGroupResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        let former_members = self.group_service.delete_group(&ctx, group_id.0).await?;
        Ok(Json(DeleteGroupResponse {
            group_id: group_id.0,
            former_members,
        }))
    }

    /// Create or replace the group's extension; recomputes every member's access flags
    #[oai(path = "/groups/:group_id/extension", method = "put", tag = "GroupTags::Groups")]
    async fn save_extension(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
        body: Json<GroupExtensionRequest>,
    ) -> Result<Json<GroupResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        let details = self
            .group_service
            .save_extension(&ctx, group_id.0, &body.description, body.flags())
            .await?;
        Ok(Json(group_response(details)))
    }

    #[oai(path = "/groups/:group_id/members", method = "get", tag = "GroupTags::Members")]
    async fn list_members(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.authenticator.authenticate_superuser(req, &auth).await?;
        let members = self.group_service.list_members(group_id.0).await?;
        Ok(Json(members.into_iter().map(UserResponse::from).collect()))
    }

    #[oai(path = "/groups/:group_id/members", method = "post", tag = "GroupTags::Members")]
    async fn add_member(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
        body: Json<AddMemberRequest>,
    ) -> Result<Json<MembershipResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        self.group_service.add_member(&ctx, group_id.0, &body.user_id).await?;
        Ok(Json(MembershipResponse {
            group_id: group_id.0,
            user_id: body.0.user_id,
        }))
    }

    #[oai(path = "/groups/:group_id/members/:user_id", method = "delete", tag = "GroupTags::Members")]
    async fn remove_member(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
        user_id: Path<String>,
    ) -> Result<Json<MembershipResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        self.group_service.remove_member(&ctx, group_id.0, &user_id.0).await?;
        Ok(Json(MembershipResponse {
            group_id: group_id.0,
            user_id: user_id.0,
        }))
    }

    /// Recompute the access flags of every member without changing the group
    #[oai(path = "/groups/:group_id/recompute", method = "post", tag = "GroupTags::Groups")]
    async fn recompute(
        &self,
        req: &Request,
        auth: BearerAuth,
        group_id: Path<i32>,
    ) -> Result<Json<RecomputeResponse>, ApiError> {
        let (_, ctx) = self.authenticator.authenticate_superuser(req, &auth).await?;
        let recomputed = self.group_service.recompute_group(&ctx, group_id.0).await?;
        Ok(Json(RecomputeResponse {
            group_id: group_id.0,
            users: recomputed.into_iter().map(recomputed_response).collect(),
        }))
    }
}
