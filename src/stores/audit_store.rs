use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;
use crate::types::internal::context::RequestContext;

/// Repository for audit event storage operations
pub struct AuditStore {}

impl AuditStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Write an audit event attributed to the actor of `ctx`
    ///
    /// Runs on the caller's connection so the event commits or rolls back together
    /// with the change it describes.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if serialization or database insert fails
    pub async fn write_event(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
        event: AuditEvent,
    ) -> Result<(), InternalError> {
        let mut data = event.data;
        data.insert("request_id".to_string(), ctx.request_id.to_string().into());
        data.insert("source".to_string(), ctx.source.as_str().into());
        if let Some(ip) = ctx.ip_address {
            data.insert("ip_address".to_string(), ip.to_string().into());
        }

        let data_json = serde_json::to_string(&data)
            .map_err(|e| AuditError::Serialization(e.to_string()))?;

        let audit_event = audit_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            timestamp: Set(Utc::now().to_rfc3339()),
            event_type: Set(event.event_type.to_string()),
            actor_id: Set(ctx.actor_id.clone()),
            target: Set(event.target),
            data: Set(data_json),
        };

        audit_event
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("write_audit_event", e))?;

        Ok(())
    }

    /// Events recorded against a target, oldest first
    pub async fn events_for_target(
        &self,
        conn: &impl ConnectionTrait,
        target: &str,
    ) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .filter(audit_event::Column::Target.eq(target))
            .order_by_asc(audit_event::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_audit_events", e))
    }
}

impl Default for AuditStore {
    fn default() -> Self {
        Self::new()
    }
}
