use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dto::{AddPurchaseRequest, PurchaseView};
use crate::models::scope::{parse_record_id, OwnerScope};
use crate::models::{product, purchase};
use crate::services::stock_service::{self, movement_date, movement_total, StockMovement};

/// Entrée de stock: +quantité sur le produit
#[derive(Debug, Clone)]
pub struct PurchaseMovement {
    pub product_id: Uuid,
    pub quantity: i32,
    pub purchase_date: NaiveDate,
    pub total: Option<Decimal>,
}

impl PurchaseMovement {
    pub fn from_request(request: &AddPurchaseRequest) -> Result<Self, AppError> {
        Ok(Self {
            product_id: parse_record_id(&request.product_id, "Product")?,
            quantity: request.quantity_purchased,
            purchase_date: movement_date(request.purchase_date.as_deref(), "purchaseDate")?,
            total: request.total_purchase_amount,
        })
    }
}

#[async_trait]
impl StockMovement for PurchaseMovement {
    type Record = purchase::Model;

    fn product_id(&self) -> Uuid {
        self.product_id
    }

    fn delta(&self) -> i32 {
        self.quantity
    }

    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        owner_id: Uuid,
        product: &product::Model,
    ) -> Result<purchase::Model, AppError> {
        let total = movement_total(self.total, product.price, self.quantity)?;

        let purchase = purchase::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            product_id: Set(product.id),
            quantity_purchased: Set(self.quantity),
            purchase_date: Set(self.purchase_date),
            total_purchase_amount: Set(total),
            created_at: Set(Utc::now()),
        };

        Ok(purchase.insert(txn).await?)
    }
}

pub struct PurchaseService;

impl PurchaseService {
    /// Enregistre un achat et augmente le stock dans la même transaction
    pub async fn create(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: &AddPurchaseRequest,
    ) -> Result<(purchase::Model, product::Model), AppError> {
        let movement = PurchaseMovement::from_request(request)?;
        stock_service::record(db, owner_id, movement).await
    }

    /// Achats du scope, du plus récent au plus ancien, avec le produit inclus
    pub async fn list(
        db: &DatabaseConnection,
        scope: OwnerScope,
    ) -> Result<Vec<PurchaseView>, DbErr> {
        let rows = scope
            .apply(purchase::Entity::find(), purchase::Column::UserId)
            .find_also_related(product::Entity)
            .order_by_desc(purchase::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(purchase, product)| PurchaseView::new(purchase, product))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quantity: i32, date: Option<&str>) -> AddPurchaseRequest {
        AddPurchaseRequest {
            user_id: None,
            product_id: "5f0c4f0e-6e7b-4b8f-9d0a-2b1f3c4d5e6f".to_string(),
            quantity_purchased: quantity,
            purchase_date: date.map(str::to_string),
            total_purchase_amount: None,
        }
    }

    #[test]
    fn test_purchase_increases_stock() {
        let movement = PurchaseMovement::from_request(&request(5, Some("2024-03-10"))).unwrap();

        assert_eq!(movement.delta(), 5);
        assert_eq!(movement.purchase_date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn test_invalid_product_id_is_rejected() {
        let mut bad = request(1, None);
        bad.product_id = "not-an-id".to_string();

        assert!(matches!(
            PurchaseMovement::from_request(&bad),
            Err(AppError::Validation(msg)) if msg == "Invalid Product ID format"
        ));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        assert!(PurchaseMovement::from_request(&request(1, Some("March 10"))).is_err());
    }
}
