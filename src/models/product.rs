// ============================================================================
// MODÈLE : PRODUCT
// ============================================================================
//
// Colonnes de la table products:
//   - id (UUID, PRIMARY KEY)
//   - user_id (UUID, NOT NULL, FK vers users) - propriétaire
//   - name, manufacturer (VARCHAR, NOT NULL)
//   - stock (INTEGER, NOT NULL) - jamais négatif
//   - price (DECIMAL, NOT NULL) - jamais négatif
//   - category (VARCHAR, défaut "Uncategorized")
//   - description (VARCHAR, défaut "")
//   - is_active (BOOLEAN, défaut TRUE)
//   - created_at / updated_at (TIMESTAMPTZ)
//
// Points d'attention:
//   - stock n'est modifié que par stock_service (achat/vente) ou par
//     l'édition directe du stock
//   - ON DELETE CASCADE vers purchases et sales
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub stock: i32,
    pub price: Decimal,
    pub category: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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

    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchase,

    #[sea_orm(has_many = "super::sale::Entity")]
    Sale,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
