use crate::entities::{
    AuditAction, CampaignStatus, campaign_entity as campaigns, donation_entity as donations,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    Actor, CampaignPrizes, CampaignResponse, CreateCampaignRequest, RankingEntry,
    RankingResponse,
};
use crate::services::AuditService;
use crate::utils::RetryPolicy;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, IsolationLevel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use std::collections::HashMap;

const RANKING_SIZE: usize = 3;

/// Campaign lifecycle: creation, closing, history and rankings.
#[derive(Clone)]
pub struct CampaignService {
    pool: DatabaseConnection,
    audit: AuditService,
    retry: RetryPolicy,
}

impl CampaignService {
    pub fn new(pool: DatabaseConnection, audit: AuditService, retry: RetryPolicy) -> Self {
        Self { pool, audit, retry }
    }

    /// Create a campaign.
    ///
    /// With `activate`, every campaign that is active right now is closed in
    /// the same transaction, so at most one campaign is ever active. Without
    /// it the campaign is stored closed.
    pub async fn create_campaign(
        &self,
        req: &CreateCampaignRequest,
        actor: &Actor,
    ) -> AppResult<CampaignResponse> {
        actor.require_admin()?;
        req.validate()?;

        self.retry
            .run("create_campaign", || self.try_create_campaign(req, actor))
            .await
    }

    async fn try_create_campaign(
        &self,
        req: &CreateCampaignRequest,
        actor: &Actor,
    ) -> AppResult<CampaignResponse> {
        let txn = self
            .pool
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;
        let now = Utc::now();

        let status = if req.activate {
            let active = campaigns::Entity::find()
                .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
                .lock_exclusive()
                .all(&txn)
                .await?;
            for campaign in active {
                self.close(&txn, campaign, actor).await?;
            }
            CampaignStatus::Active
        } else {
            CampaignStatus::Closed
        };

        let prizes = serde_json::to_value(&req.prizes)?;
        let model = campaigns::ActiveModel {
            name: Set(req.name.trim().to_string()),
            draw_date: Set(req.draw_date),
            main_prize: Set(req.main_prize.trim().to_string()),
            prizes: Set(prizes.clone()),
            goal_kg: Set(req.goal_kg),
            status: Set(status),
            last_serial: Set(0),
            total_weight_kg: Set(0.0),
            total_tickets: Set(0),
            total_donors: Set(0),
            total_classes: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let after = json!({
            "name": model.name,
            "drawDate": model.draw_date,
            "mainPrize": model.main_prize,
            "prizes": prizes,
            "goalKg": model.goal_kg,
            "status": model.status,
        });
        self.audit
            .record(
                &txn,
                actor,
                AuditAction::CreateCampaign,
                model.id,
                None,
                Some(after),
            )
            .await?;

        txn.commit().await?;

        log::info!(
            "Campaign {} ({}) created by {} with status {}",
            model.id,
            model.name,
            actor.id,
            model.status
        );
        Ok(model.into())
    }

    /// Close an active campaign without drawing.
    ///
    /// Only `active -> closed` is allowed: a closed campaign stays closed.
    pub async fn set_campaign_status(
        &self,
        campaign_id: i32,
        status: CampaignStatus,
        actor: &Actor,
    ) -> AppResult<CampaignResponse> {
        actor.require_admin()?;

        self.retry
            .run("set_campaign_status", || {
                self.try_set_campaign_status(campaign_id, status, actor)
            })
            .await
    }

    async fn try_set_campaign_status(
        &self,
        campaign_id: i32,
        status: CampaignStatus,
        actor: &Actor,
    ) -> AppResult<CampaignResponse> {
        let txn = self.pool.begin().await?;

        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::CampaignNotFound(campaign_id))?;

        match (campaign.status, status) {
            (CampaignStatus::Closed, _) => {
                return Err(AppError::CampaignNotActive(campaign_id));
            }
            (CampaignStatus::Active, CampaignStatus::Active) => {
                return Err(AppError::ValidationError(format!(
                    "Campaign {campaign_id} is already active"
                )));
            }
            (CampaignStatus::Active, CampaignStatus::Closed) => {}
        }

        let updated = self.close(&txn, campaign, actor).await?;
        txn.commit().await?;

        log::info!("Campaign {campaign_id} closed by {}", actor.id);
        Ok(updated.into())
    }

    async fn close(
        &self,
        txn: &DatabaseTransaction,
        campaign: campaigns::Model,
        actor: &Actor,
    ) -> AppResult<campaigns::Model> {
        let id = campaign.id;
        let before = json!({ "status": campaign.status });

        let mut am = campaign.into_active_model();
        am.status = Set(CampaignStatus::Closed);
        am.updated_at = Set(Utc::now());
        let updated = am.update(txn).await?;

        self.audit
            .record(
                txn,
                actor,
                AuditAction::UpdateCampaignStatus,
                id,
                Some(before),
                Some(json!({ "status": updated.status })),
            )
            .await?;
        Ok(updated)
    }

    pub async fn get_campaign(&self, campaign_id: i32) -> AppResult<CampaignResponse> {
        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::CampaignNotFound(campaign_id))?;
        Ok(campaign.into())
    }

    pub async fn get_active_campaign(&self) -> AppResult<CampaignResponse> {
        let campaign = campaigns::Entity::find()
            .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
            .order_by_desc(campaigns::Column::CreatedAt)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No active campaign".into()))?;
        Ok(campaign.into())
    }

    /// All campaigns, latest draw date first
    pub async fn list_campaigns(&self) -> AppResult<Vec<CampaignResponse>> {
        let list = campaigns::Entity::find()
            .order_by_desc(campaigns::Column::DrawDate)
            .order_by_desc(campaigns::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// Top donors and classes of a campaign by collected weight.
    pub async fn ranking(&self, campaign_id: i32) -> AppResult<RankingResponse> {
        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::CampaignNotFound(campaign_id))?;

        let rows = donations::Entity::find()
            .filter(donations::Column::CampaignId.eq(campaign_id))
            .all(&self.pool)
            .await?;

        let donors = top_entries(
            rows.iter()
                .map(|d| (d.donor_id, d.donor_name.as_str(), d.weight_kg, d.codes().len())),
        );
        let classes = top_entries(
            rows.iter()
                .map(|d| (d.class_id, d.class_name.as_str(), d.weight_kg, d.codes().len())),
        );
        let prizes: CampaignPrizes = serde_json::from_value(campaign.prizes).unwrap_or_default();

        Ok(RankingResponse {
            donors,
            classes,
            prizes,
        })
    }
}

/// Sum (id, name, kg, tickets) rows per id and keep the heaviest entries.
/// Ties go to the lower id. The name is the most recent snapshot seen.
fn top_entries<'a>(rows: impl Iterator<Item = (i32, &'a str, f64, usize)>) -> Vec<RankingEntry> {
    let mut totals: HashMap<i32, RankingEntry> = HashMap::new();
    for (id, name, weight, tickets) in rows {
        let entry = totals.entry(id).or_insert_with(|| RankingEntry {
            id,
            name: name.to_string(),
            total_weight_kg: 0.0,
            total_tickets: 0,
        });
        entry.name = name.to_string();
        entry.total_weight_kg += weight;
        entry.total_tickets += tickets as i64;
    }

    let mut entries: Vec<RankingEntry> = totals.into_values().collect();
    entries.sort_by(|a, b| {
        b.total_weight_kg
            .total_cmp(&a.total_weight_kg)
            .then(a.id.cmp(&b.id))
    });
    entries.truncate(RANKING_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_entries_sums_and_orders() {
        let rows = vec![
            (1, "Ana", 3.7, 3),
            (2, "Bruno", 2.0, 2),
            (1, "Ana", 1.2, 1),
            (3, "Carla", 5.0, 5),
            (4, "Davi", 0.5, 0),
        ];
        let top = top_entries(rows.into_iter());
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].id, 3);
        assert_eq!(top[1].id, 1);
        assert!((top[1].total_weight_kg - 4.9).abs() < 1e-9);
        assert_eq!(top[1].total_tickets, 4);
        assert_eq!(top[2].id, 2);
    }

    #[test]
    fn test_top_entries_ties_break_on_id() {
        let rows = vec![(9, "Z", 2.0, 2), (4, "Y", 2.0, 2)];
        let top = top_entries(rows.into_iter());
        assert_eq!(top[0].id, 4);
        assert_eq!(top[1].id, 9);
    }

    #[test]
    fn test_top_entries_empty() {
        assert!(top_entries(std::iter::empty()).is_empty());
    }
}
