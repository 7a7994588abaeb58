use crate::entities::{
    AuditAction, CampaignStatus, campaign_entity as campaigns, ticket_entity as tickets,
};
use crate::error::{AppError, AppResult};
use crate::models::{Actor, DrawWinnerResponse};
use crate::services::AuditService;
use crate::utils::{RetryPolicy, random_ticket_offset};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::json;

/// Winner draw.
#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
    audit: AuditService,
    retry: RetryPolicy,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection, audit: AuditService, retry: RetryPolicy) -> Self {
        Self { pool, audit, retry }
    }

    /// Draw one ticket uniformly at random and close the campaign.
    ///
    /// Steps (one transaction, campaign row locked):
    /// 1. campaign must exist, be active and have at least one ticket
    /// 2. pick offset r in [0, total_tickets) and read the r-th ticket by code
    /// 3. close the campaign with the winner snapshot, guarded by
    ///    `status = active` so a concurrent draw can never win twice
    /// 4. append the draw_winner audit record
    pub async fn draw_winner(&self, campaign_id: i32, actor: &Actor) -> AppResult<DrawWinnerResponse> {
        actor.require_admin()?;

        self.retry
            .run("draw_winner", || self.try_draw_winner(campaign_id, actor))
            .await
    }

    async fn try_draw_winner(&self, campaign_id: i32, actor: &Actor) -> AppResult<DrawWinnerResponse> {
        let txn = self.pool.begin().await?;

        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::CampaignNotFound(campaign_id))?;
        if !campaign.is_active() {
            return Err(AppError::CampaignNotActive(campaign_id));
        }
        if campaign.total_tickets <= 0 {
            return Err(AppError::NoTicketsAvailable(campaign_id));
        }

        let offset = random_ticket_offset(campaign.total_tickets as u64)?;
        let ticket = tickets::Entity::find()
            .filter(tickets::Column::CampaignId.eq(campaign_id))
            .order_by_asc(tickets::Column::Code)
            .offset(offset)
            .limit(1)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Campaign {campaign_id} counts {} tickets but none at position {offset}",
                    campaign.total_tickets
                ))
            })?;

        let drawn_at = Utc::now();
        let result = campaigns::Entity::update_many()
            .set(campaigns::ActiveModel {
                status: Set(CampaignStatus::Closed),
                winner_ticket_code: Set(Some(ticket.code.clone())),
                winner_donor_id: Set(Some(ticket.donor_id)),
                winner_donor_name: Set(Some(ticket.donor_name.clone())),
                winner_class_name: Set(Some(ticket.class_name.clone())),
                winner_drawn_at: Set(Some(drawn_at)),
                updated_at: Set(drawn_at),
                ..Default::default()
            })
            .filter(campaigns::Column::Id.eq(campaign_id))
            .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(AppError::CampaignNotActive(campaign_id));
        }

        let after = json!({
            "ticketCode": ticket.code,
            "donorId": ticket.donor_id,
            "donor": ticket.donor_name,
            "class": ticket.class_name,
        });
        self.audit
            .record(
                &txn,
                actor,
                AuditAction::DrawWinner,
                campaign_id,
                None,
                Some(after),
            )
            .await?;

        txn.commit().await?;

        log::info!(
            "Campaign {campaign_id} drawn by {}: ticket {} (position {offset} of {}) won by donor {}",
            actor.id,
            ticket.code,
            campaign.total_tickets,
            ticket.donor_id
        );

        Ok(DrawWinnerResponse {
            ticket_code: ticket.code,
            donor_id: ticket.donor_id,
            donor_name: ticket.donor_name,
            class_name: ticket.class_name,
            drawn_at,
        })
    }
}
