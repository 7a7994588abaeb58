use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, RuntimeErr, SqlxError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// PostgreSQL SQLSTATEs that mean "try the transaction again":
/// serialization_failure, deadlock_detected, lock_not_available.
const TRANSIENT_SQLSTATES: &[&str] = &["40001", "40P01", "55P03"];

/// SQLite primary result codes SQLITE_BUSY and SQLITE_LOCKED. The driver
/// reports extended codes (e.g. 517 SQLITE_BUSY_SNAPSHOT), whose low byte is
/// the primary code.
const TRANSIENT_SQLITE_CODES: &[u32] = &[5, 6];

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Invalid ticket code parameters: {0}")]
    InvalidCodeParameters(String),

    #[error("Campaign {0} not found")]
    CampaignNotFound(i32),

    #[error("Campaign {0} is not active")]
    CampaignNotActive(i32),

    #[error("Donor {0} not found")]
    DonorNotFound(i32),

    #[error("Campaign {0} has no tickets to draw")]
    NoTicketsAvailable(i32),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Transient persistence conflict: {0}")]
    TransientConflict(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Whether re-running the whole transaction may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::TransientConflict(_) => true,
            AppError::DatabaseError(err) => is_transient_db_error(err),
            _ => false,
        }
    }

    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidWeight(_) => "INVALID_WEIGHT",
            AppError::InvalidCodeParameters(_) => "INVALID_CODE_PARAMETERS",
            AppError::CampaignNotFound(_) => "CAMPAIGN_NOT_FOUND",
            AppError::CampaignNotActive(_) => "CAMPAIGN_NOT_ACTIVE",
            AppError::DonorNotFound(_) => "DONOR_NOT_FOUND",
            AppError::NoTicketsAvailable(_) => "NO_TICKETS_AVAILABLE",
            AppError::PermissionDenied => "PERMISSION_DENIED",
            AppError::TransientConflict(_) | AppError::OperationFailed(_) => "OPERATION_FAILED",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

fn is_transient_db_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) => true,
        DbErr::Conn(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e)) => is_transient_sqlx_error(e),
        _ => false,
    }
}

fn is_transient_sqlx_error(err: &SqlxError) -> bool {
    match err {
        SqlxError::Database(db) => db
            .code()
            .map(|code| is_transient_db_code(&code))
            .unwrap_or(false),
        SqlxError::PoolTimedOut => true,
        _ => false,
    }
}

// SQLSTATEs are always five characters. Every SQLite BUSY/LOCKED extended
// code fits in four digits, so shorter numeric codes are SQLite's.
fn is_transient_db_code(code: &str) -> bool {
    if TRANSIENT_SQLSTATES.contains(&code) {
        return true;
    }
    match code.parse::<u32>() {
        Ok(n) if code.len() < 5 => TRANSIENT_SQLITE_CODES.contains(&(n & 0xff)),
        _ => false,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidWeight(_)
            | AppError::InvalidCodeParameters(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::CampaignNotFound(_) | AppError::DonorNotFound(_) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::CampaignNotActive(_) | AppError::NoTicketsAvailable(_) => {
                StatusCode::CONFLICT
            }
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::TransientConflict(_) | AppError::OperationFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            AppError::InvalidWeight(_)
            | AppError::InvalidCodeParameters(_)
            | AppError::CampaignNotFound(_)
            | AppError::CampaignNotActive(_)
            | AppError::DonorNotFound(_)
            | AppError::NoTicketsAvailable(_)
            | AppError::ValidationError(_)
            | AppError::NotFound(_) => {
                log::warn!("Rejected request: {self}");
                self.to_string()
            }
            AppError::PermissionDenied => {
                log::warn!("Permission denied");
                "Permission denied".to_string()
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                msg.clone()
            }
            AppError::JwtError(err) => {
                log::warn!("Invalid token: {err}");
                "Invalid access token".to_string()
            }
            AppError::OperationFailed(msg) => {
                log::error!("Operation failed: {msg}");
                msg.clone()
            }
            AppError::TransientConflict(msg) => {
                log::error!("Unretried transient conflict: {msg}");
                "Operation failed, please try again".to_string()
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            _ => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(status).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}
