use crate::entities::{AuditAction, audit_log_entity as audit};
use crate::error::AppResult;
use crate::models::{
    Actor, AuditLogPage, AuditLogQuery, AuditLogResponse, PaginatedResponse, PaginationParams,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::Value;

/// Append-only audit trail.
///
/// Writes go through the caller's connection so the record commits or rolls
/// back together with the change it describes.
#[derive(Clone)]
pub struct AuditService {
    pool: DatabaseConnection,
}

impl AuditService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn record<C: ConnectionTrait>(
        &self,
        conn: &C,
        actor: &Actor,
        action: AuditAction,
        campaign_id: i32,
        before: Option<Value>,
        after: Option<Value>,
    ) -> Result<audit::Model, DbErr> {
        audit::ActiveModel {
            actor_id: Set(actor.id.clone()),
            actor_name: Set(actor.name.clone()),
            action: Set(action),
            campaign_id: Set(campaign_id),
            before: Set(before),
            after: Set(after),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await
    }

    /// Audit records of a campaign, newest first, optionally of one action
    pub async fn list_for_campaign(
        &self,
        campaign_id: i32,
        query: &AuditLogQuery,
    ) -> AppResult<AuditLogPage> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base_query =
            audit::Entity::find().filter(audit::Column::CampaignId.eq(campaign_id));
        if let Some(action) = query.action {
            base_query = base_query.filter(audit::Column::Action.eq(action));
        }
        let total = base_query.clone().count(&self.pool).await?;

        let items = base_query
            .order_by_desc(audit::Column::CreatedAt)
            .order_by_desc(audit::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items: Vec<AuditLogResponse> = items.into_iter().map(Into::into).collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }
}
