use super::current_actor;
use crate::entities::AuditAction;
use crate::models::*;
use crate::services::{AuditService, CampaignService, DrawService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/campaigns",
    tag = "campaigns",
    request_body = CreateCampaignRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Campaign created", body = CampaignResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only")
    )
)]
/// Create a campaign; activating it closes the currently active one
pub async fn create_campaign(
    service: web::Data<CampaignService>,
    req: HttpRequest,
    body: web::Json<CreateCampaignRequest>,
) -> Result<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create_campaign(&body.into_inner(), &actor).await {
        Ok(campaign) => Ok(HttpResponse::Created().json(ApiResponse::success(campaign))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns",
    tag = "campaigns",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Campaign history, latest draw date first", body = [CampaignResponse])
    )
)]
pub async fn list_campaigns(service: web::Data<CampaignService>) -> Result<HttpResponse> {
    match service.list_campaigns().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/active",
    tag = "campaigns",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The active campaign", body = CampaignResponse),
        (status = 404, description = "No campaign is active")
    )
)]
pub async fn get_active_campaign(service: web::Data<CampaignService>) -> Result<HttpResponse> {
    match service.get_active_campaign().await {
        Ok(campaign) => Ok(HttpResponse::Ok().json(ApiResponse::success(campaign))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/{id}",
    tag = "campaigns",
    params(
        ("id" = i32, Path, description = "Campaign id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Campaign with counters and winner", body = CampaignResponse),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn get_campaign(
    service: web::Data<CampaignService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.get_campaign(path.into_inner()).await {
        Ok(campaign) => Ok(HttpResponse::Ok().json(ApiResponse::success(campaign))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/campaigns/{id}/status",
    tag = "campaigns",
    params(
        ("id" = i32, Path, description = "Campaign id")
    ),
    request_body = UpdateCampaignStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Campaign closed", body = CampaignResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Campaign not found"),
        (status = 409, description = "Campaign already closed")
    )
)]
/// Close a campaign without drawing
pub async fn update_campaign_status(
    service: web::Data<CampaignService>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<UpdateCampaignStatusRequest>,
) -> Result<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .set_campaign_status(path.into_inner(), body.status, &actor)
        .await
    {
        Ok(campaign) => Ok(HttpResponse::Ok().json(ApiResponse::success(campaign))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/campaigns/{id}/draw",
    tag = "campaigns",
    params(
        ("id" = i32, Path, description = "Campaign id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Winner drawn, campaign closed", body = DrawWinnerResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Campaign not found"),
        (status = 409, description = "Campaign not active or without tickets")
    )
)]
/// Draw the winning ticket. Every ticket has the same chance.
pub async fn draw_winner(
    service: web::Data<DrawService>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(e) => return Ok(e.error_response()),
    };
    match service.draw_winner(path.into_inner(), &actor).await {
        Ok(winner) => Ok(HttpResponse::Ok().json(ApiResponse::success(winner))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/{id}/ranking",
    tag = "campaigns",
    params(
        ("id" = i32, Path, description = "Campaign id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Top donors and classes by weight", body = RankingResponse),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn get_ranking(
    service: web::Data<CampaignService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.ranking(path.into_inner()).await {
        Ok(ranking) => Ok(HttpResponse::Ok().json(ApiResponse::success(ranking))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/{id}/audit-logs",
    tag = "campaigns",
    params(
        ("id" = i32, Path, description = "Campaign id"),
        ("page" = Option<u32>, Query, description = "Page (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)"),
        ("action" = Option<AuditAction>, Query, description = "Only records of this action")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Audit records, newest first", body = AuditLogPage)
    )
)]
pub async fn get_audit_logs(
    service: web::Data<AuditService>,
    path: web::Path<i32>,
    query: web::Query<AuditLogQuery>,
) -> Result<HttpResponse> {
    match service
        .list_for_campaign(path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn campaign_config(cfg: &mut web::ServiceConfig) {
    use super::donation::{get_donations, get_tickets, issue_tickets};

    cfg.service(
        web::scope("/campaigns")
            .route("", web::post().to(create_campaign))
            .route("", web::get().to(list_campaigns))
            .route("/active", web::get().to(get_active_campaign))
            .route("/{id}", web::get().to(get_campaign))
            .route("/{id}/status", web::put().to(update_campaign_status))
            .route("/{id}/draw", web::post().to(draw_winner))
            .route("/{id}/donations", web::post().to(issue_tickets))
            .route("/{id}/donations", web::get().to(get_donations))
            .route("/{id}/tickets", web::get().to(get_tickets))
            .route("/{id}/ranking", web::get().to(get_ranking))
            .route("/{id}/audit-logs", web::get().to(get_audit_logs)),
    );
}
