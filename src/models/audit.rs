use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{AuditAction, audit_log_entity};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AuditLogQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Only records of this action
    pub action: Option<AuditAction>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditLogResponse {
    pub id: i32,
    pub actor_id: String,
    pub actor_name: String,
    pub action: AuditAction,
    pub campaign_id: i32,
    #[schema(value_type = Option<Object>)]
    pub before: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub after: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<audit_log_entity::Model> for AuditLogResponse {
    fn from(m: audit_log_entity::Model) -> Self {
        AuditLogResponse {
            id: m.id,
            actor_id: m.actor_id,
            actor_name: m.actor_name,
            action: m.action,
            campaign_id: m.campaign_id,
            before: m.before,
            after: m.after,
            created_at: m.created_at,
        }
    }
}
