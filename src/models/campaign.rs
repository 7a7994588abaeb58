use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{CampaignStatus, campaign_entity};
use crate::error::{AppError, AppResult};

/// Prize descriptions shown on the ranking and transparency pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct CampaignPrizes {
    /// 1st place donor
    #[serde(default)]
    pub student1: String,
    #[serde(default)]
    pub student2: String,
    #[serde(default)]
    pub student3: String,
    /// Best class, if the campaign awards one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class1: Option<String>,
}

fn default_activate() -> bool {
    true
}

/// Payload for creating a campaign.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateCampaignRequest {
    pub name: String,
    /// The ticket codes use this date's year
    pub draw_date: NaiveDate,
    pub main_prize: String,
    #[serde(default)]
    pub prizes: CampaignPrizes,
    /// Optional collection goal in kilograms
    pub goal_kg: Option<f64>,
    /// Activate immediately, closing whichever campaign is active now
    #[serde(default = "default_activate")]
    pub activate: bool,
}

impl CreateCampaignRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Campaign name is required".to_string(),
            ));
        }
        if self.main_prize.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Main prize is required".to_string(),
            ));
        }
        if let Some(goal) = self.goal_kg {
            if !goal.is_finite() || goal <= 0.0 {
                return Err(AppError::ValidationError(
                    "Goal must be a positive number of kilograms".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateCampaignStatusRequest {
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CampaignCounters {
    pub total_weight_kg: f64,
    pub total_tickets: i64,
    pub total_donors: i64,
    pub total_classes: i64,
}

/// Draw result; also embedded in a closed campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct DrawWinnerResponse {
    pub ticket_code: String,
    pub donor_id: i32,
    pub donor_name: String,
    pub class_name: String,
    pub drawn_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CampaignResponse {
    pub id: i32,
    pub name: String,
    pub draw_date: NaiveDate,
    pub main_prize: String,
    pub prizes: CampaignPrizes,
    pub goal_kg: Option<f64>,
    pub status: CampaignStatus,
    pub last_serial: i64,
    pub counters: CampaignCounters,
    pub winner: Option<DrawWinnerResponse>,
    pub created_at: DateTime<Utc>,
}

impl CampaignResponse {
    fn winner_of(m: &campaign_entity::Model) -> Option<DrawWinnerResponse> {
        Some(DrawWinnerResponse {
            ticket_code: m.winner_ticket_code.clone()?,
            donor_id: m.winner_donor_id?,
            donor_name: m.winner_donor_name.clone().unwrap_or_default(),
            class_name: m.winner_class_name.clone().unwrap_or_default(),
            drawn_at: m.winner_drawn_at?,
        })
    }
}

impl From<campaign_entity::Model> for CampaignResponse {
    fn from(m: campaign_entity::Model) -> Self {
        let winner = Self::winner_of(&m);
        CampaignResponse {
            id: m.id,
            prizes: serde_json::from_value(m.prizes).unwrap_or_default(),
            name: m.name,
            draw_date: m.draw_date,
            main_prize: m.main_prize,
            goal_kg: m.goal_kg,
            status: m.status,
            last_serial: m.last_serial,
            counters: CampaignCounters {
                total_weight_kg: m.total_weight_kg,
                total_tickets: m.total_tickets,
                total_donors: m.total_donors,
                total_classes: m.total_classes,
            },
            winner,
            created_at: m.created_at,
        }
    }
}
