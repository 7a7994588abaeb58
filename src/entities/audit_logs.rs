use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    #[sea_orm(string_value = "issue_donation")]
    IssueDonation,
    #[sea_orm(string_value = "draw_winner")]
    DrawWinner,
    #[sea_orm(string_value = "create_campaign")]
    CreateCampaign,
    #[sea_orm(string_value = "update_campaign_status")]
    UpdateCampaignStatus,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::IssueDonation => write!(f, "issue_donation"),
            AuditAction::DrawWinner => write!(f, "draw_winner"),
            AuditAction::CreateCampaign => write!(f, "create_campaign"),
            AuditAction::UpdateCampaignStatus => write!(f, "update_campaign_status"),
        }
    }
}

/// Append-only audit record. Rows are inserted inside the transaction they
/// describe and never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub actor_id: String,
    pub actor_name: String,
    pub action: AuditAction,
    pub campaign_id: i32,
    #[sea_orm(column_type = "Json", nullable)]
    pub before: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub after: Option<Json>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
