use actix_cors::Cors;

/// Permissive CORS for the school's web front end. Auth travels in the
/// `Authorization` header, so credentials (cookies) are not allowed.
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
