use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dto::{AddSaleRequest, SaleView};
use crate::models::scope::{parse_record_id, OwnerScope};
use crate::models::{product, sale, store};
use crate::services::stock_service::{self, movement_date, movement_total, StockMovement};

/// Sortie de stock: -quantité sur le produit, rattachée à un magasin
#[derive(Debug, Clone)]
pub struct SaleMovement {
    pub product_id: Uuid,
    pub store_id: Uuid,
    pub quantity: i32,
    pub sale_date: NaiveDate,
    pub total: Option<Decimal>,
}

impl SaleMovement {
    pub fn from_request(request: &AddSaleRequest) -> Result<Self, AppError> {
        Ok(Self {
            product_id: parse_record_id(&request.product_id, "Product")?,
            store_id: parse_record_id(&request.store_id, "Store")?,
            quantity: request.stock_sold,
            sale_date: movement_date(request.sale_date.as_deref(), "saleDate")?,
            total: request.total_sale_amount,
        })
    }
}

#[async_trait]
impl StockMovement for SaleMovement {
    type Record = sale::Model;

    fn product_id(&self) -> Uuid {
        self.product_id
    }

    fn delta(&self) -> i32 {
        -self.quantity
    }

    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        owner_id: Uuid,
        product: &product::Model,
    ) -> Result<sale::Model, AppError> {
        // Le magasin doit exister et appartenir au même propriétaire
        store::Entity::find_by_id(self.store_id)
            .one(txn)
            .await?
            .filter(|s| s.user_id == owner_id)
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;

        let total = movement_total(self.total, product.price, self.quantity)?;

        let sale = sale::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            product_id: Set(product.id),
            store_id: Set(self.store_id),
            stock_sold: Set(self.quantity),
            sale_date: Set(self.sale_date),
            total_sale_amount: Set(total),
            created_at: Set(Utc::now()),
        };

        Ok(sale.insert(txn).await?)
    }
}

pub struct SaleService;

impl SaleService {
    /// Enregistre une vente; refusée si le stock est insuffisant
    pub async fn create(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: &AddSaleRequest,
    ) -> Result<(sale::Model, product::Model), AppError> {
        let movement = SaleMovement::from_request(request)?;
        stock_service::record(db, owner_id, movement).await
    }

    /// Ventes du scope (plus récentes d'abord) avec produit et magasin inclus
    pub async fn list(db: &DatabaseConnection, scope: OwnerScope) -> Result<Vec<SaleView>, DbErr> {
        // 1. Ventes + produit en une requête
        let rows = scope
            .apply(sale::Entity::find(), sale::Column::UserId)
            .find_also_related(product::Entity)
            .order_by_desc(sale::Column::CreatedAt)
            .all(db)
            .await?;

        // 2. Tous les magasins référencés en UNE SEULE requête
        let store_ids: Vec<Uuid> = rows
            .iter()
            .map(|(sale, _)| sale.store_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let stores: HashMap<Uuid, store::Model> = if store_ids.is_empty() {
            HashMap::new()
        } else {
            store::Entity::find()
                .filter(store::Column::Id.is_in(store_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        // 3. Assembler
        Ok(rows
            .into_iter()
            .map(|(sale, product)| {
                let store = stores.get(&sale.store_id).cloned();
                SaleView::new(sale, product, store)
            })
            .collect())
    }
}
