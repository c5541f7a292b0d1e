// ============================================================================
// MODÈLE : PURCHASE
// ============================================================================
//
// Colonnes de la table purchases:
//   - id (UUID, PRIMARY KEY)
//   - user_id (UUID, NOT NULL, FK vers users)
//   - product_id (UUID, NOT NULL, FK vers products, ON DELETE CASCADE)
//   - quantity_purchased (INTEGER, NOT NULL) - toujours > 0
//   - purchase_date (DATE, NOT NULL)
//   - total_purchase_amount (DECIMAL, NOT NULL)
//   - created_at (TIMESTAMPTZ)
//
// Workflow:
//   1. POST /api/purchase/add
//   2. stock_service verrouille le produit et ajoute la quantité au stock
//   3. La ligne purchase est insérée dans la MÊME transaction
//
// Points d'attention:
//   - Immuable après création
//   - Supprimé uniquement en cascade avec son produit
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    #[serde(rename = "ProductID")]
    pub product_id: Uuid,
    #[serde(rename = "QuantityPurchased")]
    pub quantity_purchased: i32,
    #[serde(rename = "PurchaseDate")]
    pub purchase_date: Date,
    #[serde(rename = "TotalPurchaseAmount")]
    pub total_purchase_amount: Decimal,
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

impl ActiveModelBehavior for ActiveModel {}
