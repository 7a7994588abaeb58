use super::current_actor;
use crate::models::*;
use crate::services::RosterService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/classes",
    tag = "roster",
    request_body = CreateClassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_class(
    service: web::Data<RosterService>,
    req: HttpRequest,
    body: web::Json<CreateClassRequest>,
) -> Result<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create_class(&body.into_inner(), &actor).await {
        Ok(class) => Ok(HttpResponse::Created().json(ApiResponse::success(class))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/classes",
    tag = "roster",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Classes ordered by name", body = [ClassResponse])
    )
)]
pub async fn list_classes(service: web::Data<RosterService>) -> Result<HttpResponse> {
    match service.list_classes().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/donors",
    tag = "roster",
    request_body = CreateDonorRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Donor created", body = DonorResponse),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Class not found")
    )
)]
pub async fn create_donor(
    service: web::Data<RosterService>,
    req: HttpRequest,
    body: web::Json<CreateDonorRequest>,
) -> Result<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(e) => return Ok(e.error_response()),
    };
    match service.create_donor(&body.into_inner(), &actor).await {
        Ok(donor) => Ok(HttpResponse::Created().json(ApiResponse::success(donor))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/donors",
    tag = "roster",
    params(
        ("class_id" = Option<i32>, Query, description = "Only donors of this class")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Donors ordered by name", body = [DonorResponse])
    )
)]
pub async fn list_donors(
    service: web::Data<RosterService>,
    query: web::Query<DonorQuery>,
) -> Result<HttpResponse> {
    match service.list_donors(&query.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn roster_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/classes")
            .route("", web::post().to(create_class))
            .route("", web::get().to(list_classes)),
    )
    .service(
        web::scope("/donors")
            .route("", web::post().to(create_donor))
            .route("", web::get().to(list_donors)),
    );
}
