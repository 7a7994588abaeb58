use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{class_entity, donor_entity};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateClassRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<class_entity::Model> for ClassResponse {
    fn from(m: class_entity::Model) -> Self {
        ClassResponse {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateDonorRequest {
    pub name: String,
    pub class_id: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DonorQuery {
    pub class_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DonorResponse {
    pub id: i32,
    pub name: String,
    pub class_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<donor_entity::Model> for DonorResponse {
    fn from(m: donor_entity::Model) -> Self {
        DonorResponse {
            id: m.id,
            name: m.name,
            class_id: m.class_id,
            created_at: m.created_at,
        }
    }
}
