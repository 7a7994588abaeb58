use chrono::{DateTime, NaiveDate, Utc};
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
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Active => write!(f, "active"),
            CampaignStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Campaign aggregate.
///
/// - last_serial: serial of the most recently issued ticket (0 = none yet).
///   Only issuance moves it, always under a row lock.
/// - total_*: running counters, never decrease while the campaign is active
/// - winner_*: set together by the draw, in the same write that closes the
///   campaign
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub draw_date: NaiveDate,
    pub main_prize: String,
    /// {"student1", "student2", "student3", "class1"?}
    #[sea_orm(column_type = "Json")]
    pub prizes: Json,
    pub goal_kg: Option<f64>,
    pub status: CampaignStatus,
    pub last_serial: i64,
    pub total_weight_kg: f64,
    pub total_tickets: i64,
    pub total_donors: i64,
    pub total_classes: i64,
    pub winner_ticket_code: Option<String>,
    pub winner_donor_id: Option<i32>,
    pub winner_donor_name: Option<String>,
    pub winner_class_name: Option<String>,
    pub winner_drawn_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
