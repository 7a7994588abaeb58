use super::current_actor;
use crate::models::*;
use crate::services::TicketService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/campaigns/{id}/donations",
    tag = "donations",
    params(
        ("id" = i32, Path, description = "Campaign id")
    ),
    request_body = IssueTicketsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Donation recorded and tickets issued", body = IssueTicketsResponse),
        (status = 400, description = "Weight below 1 kg or invalid"),
        (status = 404, description = "Campaign or donor not found"),
        (status = 409, description = "Campaign not active")
    )
)]
/// Register a weighed donation; one ticket per whole kilogram
pub async fn issue_tickets(
    service: web::Data<TicketService>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<IssueTicketsRequest>,
) -> Result<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(e) => return Ok(e.error_response()),
    };
    match service
        .issue_tickets(path.into_inner(), &body.into_inner(), &actor)
        .await
    {
        Ok(issued) => {
            let message = format!("{} ticket(s) issued", issued.ticket_codes.len());
            Ok(HttpResponse::Created().json(ApiResponse::success_with_message(issued, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/{id}/donations",
    tag = "donations",
    params(
        ("id" = i32, Path, description = "Campaign id"),
        ("page" = Option<u32>, Query, description = "Page (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Donations, most recent first", body = DonationPage),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn get_donations(
    service: web::Data<TicketService>,
    path: web::Path<i32>,
    query: web::Query<DonationQuery>,
) -> Result<HttpResponse> {
    match service
        .list_donations(path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/campaigns/{id}/tickets",
    tag = "donations",
    params(
        ("id" = i32, Path, description = "Campaign id"),
        ("page" = Option<u32>, Query, description = "Page (default 1)"),
        ("per_page" = Option<u32>, Query, description = "Page size (default 20)"),
        ("search" = Option<String>, Query, description = "Part of a ticket code or donor name")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Tickets ordered by code", body = TicketPage),
        (status = 404, description = "Campaign not found")
    )
)]
pub async fn get_tickets(
    service: web::Data<TicketService>,
    path: web::Path<i32>,
    query: web::Query<TicketQuery>,
) -> Result<HttpResponse> {
    match service
        .list_tickets(path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}
