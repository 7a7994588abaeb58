use crate::entities::{
    AuditAction, campaign_entity as campaigns, class_entity as classes,
    donation_entity as donations, donor_entity as donors, ticket_entity as tickets,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    Actor, DonationPage, DonationQuery, DonationResponse, IssueTicketsRequest,
    IssueTicketsResponse, PaginatedResponse, PaginationParams, Recorder, TicketPage, TicketQuery,
    TicketResponse,
};
use crate::services::AuditService;
use crate::utils::{RetryPolicy, format_ticket_code, tickets_for_weight};
use chrono::{Datelike, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::json;

/// Rows per INSERT when writing tickets; keeps each statement well under
/// the bind parameter limits of both PostgreSQL and SQLite.
const TICKET_INSERT_CHUNK: usize = 100;

/// Donation registration and the ticket ledger.
#[derive(Clone)]
pub struct TicketService {
    pool: DatabaseConnection,
    audit: AuditService,
    retry: RetryPolicy,
}

impl TicketService {
    pub fn new(pool: DatabaseConnection, audit: AuditService, retry: RetryPolicy) -> Self {
        Self { pool, audit, retry }
    }

    /// Record a donation and mint one ticket per whole kilogram.
    ///
    /// Runs as a single transaction holding the campaign row lock:
    /// 1. the campaign must exist and be active
    /// 2. the donor and their class are resolved and snapshotted
    /// 3. serials `last_serial + 1 ..= last_serial + n` are reserved
    /// 4. donation, tickets, counters and the audit record are written
    ///
    /// Any failure leaves no trace. Transient conflicts re-run the whole
    /// transaction.
    pub async fn issue_tickets(
        &self,
        campaign_id: i32,
        req: &IssueTicketsRequest,
        actor: &Actor,
    ) -> AppResult<IssueTicketsResponse> {
        let count = tickets_for_weight(req.weight_kg)?;

        self.retry
            .run("issue_tickets", || {
                self.try_issue_tickets(campaign_id, req, count, actor)
            })
            .await
    }

    async fn try_issue_tickets(
        &self,
        campaign_id: i32,
        req: &IssueTicketsRequest,
        count: i64,
        actor: &Actor,
    ) -> AppResult<IssueTicketsResponse> {
        let txn = self.pool.begin().await?;

        let campaign = campaigns::Entity::find_by_id(campaign_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::CampaignNotFound(campaign_id))?;
        if !campaign.is_active() {
            return Err(AppError::CampaignNotActive(campaign_id));
        }

        let donor = donors::Entity::find_by_id(req.donor_id)
            .one(&txn)
            .await?
            .ok_or(AppError::DonorNotFound(req.donor_id))?;
        // A donor whose class is gone cannot be attributed
        let class = classes::Entity::find_by_id(donor.class_id)
            .one(&txn)
            .await?
            .ok_or(AppError::DonorNotFound(req.donor_id))?;

        let first_serial = campaign.last_serial + 1;
        let last_serial = campaign
            .last_serial
            .checked_add(count)
            .ok_or_else(|| AppError::ValidationError("Ticket serial overflow".into()))?;
        let year = i64::from(campaign.draw_date.year());
        let codes = (first_serial..=last_serial)
            .map(|serial| format_ticket_code(year, serial))
            .collect::<AppResult<Vec<String>>>()?;

        let first_for_donor = !self
            .has_donation(&txn, campaign_id, donations::Column::DonorId, donor.id)
            .await?;
        let first_for_class = !self
            .has_donation(&txn, campaign_id, donations::Column::ClassId, class.id)
            .await?;

        let now = Utc::now();
        let recorder = req.recorder.clone().unwrap_or_else(|| Recorder {
            id: actor.id.clone(),
            name: actor.name.clone(),
        });

        let donation = donations::ActiveModel {
            campaign_id: Set(campaign_id),
            donor_id: Set(donor.id),
            donor_name: Set(donor.name.clone()),
            class_id: Set(class.id),
            class_name: Set(class.name.clone()),
            weight_kg: Set(req.weight_kg),
            ticket_codes: Set(json!(codes)),
            donated_at: Set(req.donation_date.unwrap_or(now)),
            recorded_by_id: Set(recorder.id),
            recorded_by_name: Set(recorder.name),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let rows: Vec<tickets::ActiveModel> = (first_serial..=last_serial)
            .zip(codes.iter())
            .map(|(serial, code)| tickets::ActiveModel {
                campaign_id: Set(campaign_id),
                donation_id: Set(donation.id),
                serial: Set(serial),
                code: Set(code.clone()),
                donor_id: Set(donor.id),
                donor_name: Set(donor.name.clone()),
                class_id: Set(class.id),
                class_name: Set(class.name.clone()),
                issued_at: Set(now),
                ..Default::default()
            })
            .collect();
        for chunk in rows.chunks(TICKET_INSERT_CHUNK) {
            tickets::Entity::insert_many(chunk.to_vec())
                .exec(&txn)
                .await?;
        }

        let overflow = || AppError::ValidationError("Campaign counter overflow".into());
        let total_tickets = campaign
            .total_tickets
            .checked_add(count)
            .ok_or_else(overflow)?;
        let total_donors = campaign
            .total_donors
            .checked_add(i64::from(first_for_donor))
            .ok_or_else(overflow)?;
        let total_classes = campaign
            .total_classes
            .checked_add(i64::from(first_for_class))
            .ok_or_else(overflow)?;
        let total_weight_kg = campaign.total_weight_kg + req.weight_kg;

        let mut am = campaign.into_active_model();
        am.last_serial = Set(last_serial);
        am.total_weight_kg = Set(total_weight_kg);
        am.total_tickets = Set(total_tickets);
        am.total_donors = Set(total_donors);
        am.total_classes = Set(total_classes);
        am.updated_at = Set(now);
        am.update(&txn).await?;

        let after = json!({
            "donationId": donation.id,
            "donorId": donor.id,
            "donor": donor.name,
            "classId": class.id,
            "class": class.name,
            "weightKg": req.weight_kg,
            "ticketCodes": codes,
        });
        self.audit
            .record(
                &txn,
                actor,
                AuditAction::IssueDonation,
                campaign_id,
                None,
                Some(after),
            )
            .await?;

        txn.commit().await?;

        log::info!(
            "Donation {} of {} kg by donor {} in campaign {}: {} tickets ({}..{})",
            donation.id,
            req.weight_kg,
            donor.id,
            campaign_id,
            count,
            first_serial,
            last_serial
        );

        Ok(IssueTicketsResponse {
            donation_id: donation.id,
            ticket_codes: codes,
        })
    }

    async fn has_donation(
        &self,
        txn: &DatabaseTransaction,
        campaign_id: i32,
        column: donations::Column,
        id: i32,
    ) -> AppResult<bool> {
        let existing = donations::Entity::find()
            .filter(donations::Column::CampaignId.eq(campaign_id))
            .filter(column.eq(id))
            .one(txn)
            .await?;
        Ok(existing.is_some())
    }

    /// Tickets of a campaign ordered by code.
    ///
    /// `search` matches a substring of the code or the donor name, ignoring
    /// case.
    pub async fn list_tickets(&self, campaign_id: i32, query: &TicketQuery) -> AppResult<TicketPage> {
        self.ensure_campaign(campaign_id).await?;
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base_query =
            tickets::Entity::find().filter(tickets::Column::CampaignId.eq(campaign_id));
        if let Some(term) = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", term.to_lowercase());
            base_query = base_query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(tickets::Column::Code))).like(&pattern))
                    .add(
                        Expr::expr(Func::lower(Expr::col(tickets::Column::DonorName)))
                            .like(&pattern),
                    ),
            );
        }

        let total = base_query.clone().count(&self.pool).await?;
        let items = base_query
            .order_by_asc(tickets::Column::Code)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items: Vec<TicketResponse> = items.into_iter().map(Into::into).collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// Donations of a campaign, most recent donation date first
    pub async fn list_donations(
        &self,
        campaign_id: i32,
        query: &DonationQuery,
    ) -> AppResult<DonationPage> {
        self.ensure_campaign(campaign_id).await?;
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query =
            donations::Entity::find().filter(donations::Column::CampaignId.eq(campaign_id));
        let total = base_query.clone().count(&self.pool).await?;
        let items = base_query
            .order_by_desc(donations::Column::DonatedAt)
            .order_by_desc(donations::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let items: Vec<DonationResponse> = items.into_iter().map(Into::into).collect();
        Ok(PaginatedResponse::new(items, &params, total))
    }

    async fn ensure_campaign(&self, campaign_id: i32) -> AppResult<()> {
        campaigns::Entity::find_by_id(campaign_id)
            .one(&self.pool)
            .await?
            .map(|_| ())
            .ok_or(AppError::CampaignNotFound(campaign_id))
    }
}
