use crate::error::{AppError, AppResult};
use crate::models::{Actor, Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id at the identity provider
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl From<Claims> for Actor {
    fn from(c: Claims) -> Self {
        Actor {
            id: c.sub,
            name: c.name,
            role: c.role,
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
        }
    }

    /// Tokens normally come from the identity provider; this is for operators
    /// and tests that share the signing secret.
    pub fn generate_access_token(&self, actor: &Actor) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expires_in);

        let claims = Claims {
            sub: actor.id.clone(),
            name: actor.name.clone(),
            role: actor.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)?;

        if claims.sub.trim().is_empty() {
            return Err(AppError::AuthError("Token has no subject".to_string()));
        }

        Ok(claims)
    }
}
