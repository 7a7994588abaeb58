use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::ticket_entity;

/// Ticket listing filters
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TicketQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Matches ticket code or donor name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketResponse {
    pub id: i32,
    pub code: String,
    pub serial: i64,
    pub donor_id: i32,
    pub donor_name: String,
    pub class_id: i32,
    pub class_name: String,
    pub issued_at: DateTime<Utc>,
}

impl From<ticket_entity::Model> for TicketResponse {
    fn from(m: ticket_entity::Model) -> Self {
        TicketResponse {
            id: m.id,
            code: m.code,
            serial: m.serial,
            donor_id: m.donor_id,
            donor_name: m.donor_name,
            class_id: m.class_id,
            class_name: m.class_name,
            issued_at: m.issued_at,
        }
    }
}
