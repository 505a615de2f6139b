use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    UserProvisioned,
    ProfileUpdated,
    MemberStatusChanged,
    GroupSaved,
    GroupDeleted,
    GroupExtensionSaved,
    MembershipAdded,
    MembershipRemoved,
    AccessFlagsRecomputed,
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::UserProvisioned => "user_provisioned",
            Self::ProfileUpdated => "profile_updated",
            Self::MemberStatusChanged => "member_status_changed",
            Self::GroupSaved => "group_saved",
            Self::GroupDeleted => "group_deleted",
            Self::GroupExtensionSaved => "group_extension_saved",
            Self::MembershipAdded => "membership_added",
            Self::MembershipRemoved => "membership_removed",
            Self::AccessFlagsRecomputed => "access_flags_recomputed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit event structure for building and storing audit logs
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub target: String,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event_type: EventType, target: impl Into<String>) -> Self {
        Self {
            event_type,
            target: target.into(),
            data: HashMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}
