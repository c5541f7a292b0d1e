use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dto::AddStoreRequest;
use crate::models::scope::OwnerScope;
use crate::models::store;

pub struct StoreService;

impl StoreService {
    pub async fn create(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: &AddStoreRequest,
    ) -> Result<store::Model, AppError> {
        let store = store::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            name: Set(request.name.trim().to_string()),
            category: Set(request.category.trim().to_string()),
            address: Set(request.address.trim().to_string()),
            city: Set(request.city.trim().to_string()),
            image: Set(request.image.clone().unwrap_or_default()),
            created_at: Set(Utc::now()),
        };

        let store = store.insert(db).await?;
        tracing::info!(store_id = %store.id, owner = %owner_id, "store created");
        Ok(store)
    }

    pub async fn list(db: &DatabaseConnection, scope: OwnerScope) -> Result<Vec<store::Model>, DbErr> {
        scope
            .apply(store::Entity::find(), store::Column::UserId)
            .order_by_desc(store::Column::CreatedAt)
            .all(db)
            .await
    }
}
