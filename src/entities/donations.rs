use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One weighed donation.
/// - donor_name / class_name are snapshots taken when the donation was
///   recorded; renaming a donor later does not touch existing rows
/// - ticket_codes: JSON array of the codes minted for this donation
/// - weight_kg is the exact value the ticket count was derived from
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub campaign_id: i32,
    pub donor_id: i32,
    pub donor_name: String,
    pub class_id: i32,
    pub class_name: String,
    pub weight_kg: f64,
    #[sea_orm(column_type = "Json")]
    pub ticket_codes: Json,
    pub donated_at: DateTime<Utc>,
    pub recorded_by_id: String,
    pub recorded_by_name: String,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn codes(&self) -> Vec<String> {
        serde_json::from_value(self.ticket_codes.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
