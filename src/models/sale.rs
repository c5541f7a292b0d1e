// ============================================================================
// MODÈLE : SALE
// ============================================================================
//
// Colonnes de la table sales:
//   - id (UUID, PRIMARY KEY)
//   - user_id (UUID, NOT NULL, FK vers users)
//   - product_id (UUID, NOT NULL, FK vers products, ON DELETE CASCADE)
//   - store_id (UUID, NOT NULL, FK vers stores)
//   - stock_sold (INTEGER, NOT NULL) - toujours > 0
//   - sale_date (DATE, NOT NULL)
//   - total_sale_amount (DECIMAL, NOT NULL)
//   - created_at (TIMESTAMPTZ)
//
// Points d'attention:
//   - Même cycle de vie que purchase: immuable, supprimé en cascade
//   - Une vente ne peut pas rendre le stock négatif (vérifié dans la
//     transaction, pas ici)
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    #[serde(rename = "ProductID")]
    pub product_id: Uuid,
    #[serde(rename = "StoreID")]
    pub store_id: Uuid,
    #[serde(rename = "StockSold")]
    pub stock_sold: i32,
    #[serde(rename = "SaleDate")]
    pub sale_date: Date,
    #[serde(rename = "TotalSaleAmount")]
    pub total_sale_amount: Decimal,
    #[serde(rename = "createdAt")]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,

    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
