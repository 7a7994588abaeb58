use crate::entities::{class_entity as classes, donor_entity as donors};
use crate::error::{AppError, AppResult};
use crate::models::{
    Actor, ClassResponse, CreateClassRequest, CreateDonorRequest, DonorQuery, DonorResponse,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Classes and donors. Donations only read from here.
#[derive(Clone)]
pub struct RosterService {
    pool: DatabaseConnection,
}

impl RosterService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_class(
        &self,
        req: &CreateClassRequest,
        actor: &Actor,
    ) -> AppResult<ClassResponse> {
        actor.require_admin()?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Class name is required".into()));
        }

        let model = classes::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Class {} ({}) created by {}", model.id, model.name, actor.id);
        Ok(model.into())
    }

    pub async fn list_classes(&self) -> AppResult<Vec<ClassResponse>> {
        let list = classes::Entity::find()
            .order_by_asc(classes::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn create_donor(
        &self,
        req: &CreateDonorRequest,
        actor: &Actor,
    ) -> AppResult<DonorResponse> {
        actor.require_admin()?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Donor name is required".into()));
        }

        classes::Entity::find_by_id(req.class_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class {} not found", req.class_id)))?;

        let model = donors::ActiveModel {
            name: Set(name.to_string()),
            class_id: Set(req.class_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Donor {} ({}) added to class {}",
            model.id,
            model.name,
            model.class_id
        );
        Ok(model.into())
    }

    /// Donors ordered by name, optionally restricted to one class
    pub async fn list_donors(&self, query: &DonorQuery) -> AppResult<Vec<DonorResponse>> {
        let mut select = donors::Entity::find();
        if let Some(class_id) = query.class_id {
            select = select.filter(donors::Column::ClassId.eq(class_id));
        }
        let list = select
            .order_by_asc(donors::Column::Name)
            .order_by_asc(donors::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}
