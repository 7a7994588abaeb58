pub mod campaign;
pub mod donation;
pub mod roster;

pub use campaign::campaign_config;
pub use roster::roster_config;

use crate::error::{AppError, AppResult};
use crate::models::Actor;
use actix_web::{HttpMessage, HttpRequest};

/// Actor injected by the auth middleware
fn current_actor(req: &HttpRequest) -> AppResult<Actor> {
    req.extensions()
        .get::<Actor>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing authenticated actor".into()))
}
