use std::net::IpAddr;

use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries who is acting and where the request came from, for tracing and for
/// the actor recorded on audit events.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Validated token claims if the request is authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Context for an authenticated API request made by `user_id`
    pub fn for_api(user_id: &str, claims: Claims, ip_address: Option<IpAddr>) -> Self {
        Self {
            ip_address,
            request_id: RequestId::generate(),
            claims: Some(claims),
            source: RequestSource::API,
            actor_id: format!("user:{}", user_id),
        }
    }

    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            claims: None,
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
        }
    }

    pub fn authenticated(&self) -> bool {
        self.claims.is_some()
    }
}
