use serde::Serialize;
use utoipa::ToSchema;

use super::CampaignPrizes;

/// Aggregated contribution of one donor or one class.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct RankingEntry {
    pub id: i32,
    pub name: String,
    pub total_weight_kg: f64,
    pub total_tickets: i64,
}

/// Top three donors and classes by weight, with the prizes they compete for.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankingResponse {
    pub donors: Vec<RankingEntry>,
    pub classes: Vec<RankingEntry>,
    pub prizes: CampaignPrizes,
}
