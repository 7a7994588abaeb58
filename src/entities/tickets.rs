use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Raffle ticket, one per whole kilogram. Never updated after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub campaign_id: i32,
    pub donation_id: i32,
    pub serial: i64,
    /// RF-<year>-<serial>, unique per campaign
    pub code: String,
    pub donor_id: i32,
    pub donor_name: String,
    pub class_id: i32,
    pub class_name: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
