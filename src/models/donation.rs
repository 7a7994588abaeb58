use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::donation_entity;

/// Who physically recorded the donation, when different from the caller.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
pub struct Recorder {
    pub id: String,
    pub name: String,
}

/// Register a weighed donation and mint its tickets.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IssueTicketsRequest {
    pub donor_id: i32,
    /// Kilograms; one ticket per whole kilogram
    pub weight_kg: f64,
    /// Defaults to now
    pub donation_date: Option<DateTime<Utc>>,
    /// Defaults to the authenticated caller
    pub recorder: Option<Recorder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueTicketsResponse {
    pub donation_id: i32,
    /// Codes to print on the receipts, in serial order
    pub ticket_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DonationQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DonationResponse {
    pub id: i32,
    pub campaign_id: i32,
    pub donor_id: i32,
    pub donor_name: String,
    pub class_id: i32,
    pub class_name: String,
    pub weight_kg: f64,
    pub ticket_codes: Vec<String>,
    pub donated_at: DateTime<Utc>,
    pub recorded_by: Recorder,
}

impl From<donation_entity::Model> for DonationResponse {
    fn from(m: donation_entity::Model) -> Self {
        DonationResponse {
            ticket_codes: m.codes(),
            id: m.id,
            campaign_id: m.campaign_id,
            donor_id: m.donor_id,
            donor_name: m.donor_name,
            class_id: m.class_id,
            class_name: m.class_name,
            weight_kg: m.weight_kg,
            donated_at: m.donated_at,
            recorded_by: Recorder {
                id: m.recorded_by_id,
                name: m.recorded_by_name,
            },
        }
    }
}
