use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dto::{AddProductRequest, UpdateProductRequest};
use crate::models::product::{self, DEFAULT_CATEGORY};
use crate::models::scope::{parse_record_id, OwnerScope};
use crate::models::{purchase, sale};
use crate::services::stock_service;

pub struct ProductService;

/// Résultat d'une suppression de produit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedProduct {
    pub product_id: Uuid,
    pub purchases_deleted: u64,
    pub sales_deleted: u64,
}

/// Prix optionnel -> prix validé (0 par défaut)
fn checked_price(price: Option<Decimal>) -> Result<Decimal, AppError> {
    let price = price.unwrap_or(Decimal::ZERO);
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::Validation("Price cannot be negative".to_string()));
    }
    Ok(price)
}

/// Motif LIKE insensible à la casse; % et _ saisis sont pris littéralement
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl ProductService {
    /// Crée un produit avec un stock initial de 0
    pub async fn create(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: &AddProductRequest,
    ) -> Result<product::Model, AppError> {
        let now = Utc::now();
        let category = request
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            name: Set(request.name.trim().to_string()),
            manufacturer: Set(request.manufacturer.trim().to_string()),
            stock: Set(0),
            price: Set(checked_price(request.price)?),
            category: Set(category.to_string()),
            description: Set(request.description.clone().unwrap_or_default()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let product = product.insert(db).await?;
        tracing::info!(product_id = %product.id, owner = %owner_id, "product created");
        Ok(product)
    }

    /// Produits du scope, plus récents d'abord
    pub async fn list(
        db: &DatabaseConnection,
        scope: OwnerScope,
    ) -> Result<Vec<product::Model>, DbErr> {
        scope
            .apply(product::Entity::find(), product::Column::UserId)
            .order_by_desc(product::Column::CreatedAt)
            .all(db)
            .await
    }

    /// Recherche par nom (sous-chaîne, insensible à la casse)
    pub async fn search(
        db: &DatabaseConnection,
        scope: OwnerScope,
        term: &str,
    ) -> Result<Vec<product::Model>, DbErr> {
        scope
            .apply(product::Entity::find(), product::Column::UserId)
            .filter(Expr::expr(Func::lower(Expr::col(product::Column::Name))).like(like_pattern(term)))
            .order_by_desc(product::Column::CreatedAt)
            .all(db)
            .await
    }

    /// Met à jour les champs descriptifs (jamais le stock)
    pub async fn update(
        db: &DatabaseConnection,
        owner_id: Uuid,
        request: &UpdateProductRequest,
    ) -> Result<product::Model, AppError> {
        let product_id = parse_record_id(&request.product_id, "Product")?;
        let product = Self::find_owned(db, owner_id, product_id).await?;

        let mut active: product::ActiveModel = product.into();
        active.name = Set(request.name.trim().to_string());
        active.manufacturer = Set(request.manufacturer.trim().to_string());
        if let Some(description) = &request.description {
            active.description = Set(description.clone());
        }
        if let Some(category) = request.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            active.category = Set(category.to_string());
        }
        if request.price.is_some() {
            active.price = Set(checked_price(request.price)?);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Supprime un produit et TOUS ses achats et ventes
    pub async fn delete(
        db: &DatabaseConnection,
        owner_id: Uuid,
        product_id: Uuid,
    ) -> Result<DeletedProduct, AppError> {
        let txn = db.begin().await?;

        // 1. Vérifier l'existence et le propriétaire
        let product = product::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .filter(|p| p.user_id == owner_id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        // 2. Supprimer le registre lié
        let purchases = purchase::Entity::delete_many()
            .filter(purchase::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;
        let sales = sale::Entity::delete_many()
            .filter(sale::Column::ProductId.eq(product.id))
            .exec(&txn)
            .await?;

        // 3. Supprimer le produit
        product::Entity::delete_by_id(product.id).exec(&txn).await?;
        txn.commit().await?;

        let deleted = DeletedProduct {
            product_id: product.id,
            purchases_deleted: purchases.rows_affected,
            sales_deleted: sales.rows_affected,
        };
        tracing::info!(
            product_id = %deleted.product_id,
            purchases = deleted.purchases_deleted,
            sales = deleted.sales_deleted,
            "product deleted"
        );
        Ok(deleted)
    }

    /// Édition directe du stock
    pub async fn set_stock(
        db: &DatabaseConnection,
        owner_id: Uuid,
        product_id: Uuid,
        stock: i32,
    ) -> Result<product::Model, AppError> {
        stock_service::set_stock(db, owner_id, product_id, stock).await
    }

    async fn find_owned(
        db: &DatabaseConnection,
        owner_id: Uuid,
        product_id: Uuid,
    ) -> Result<product::Model, AppError> {
        product::Entity::find_by_id(product_id)
            .one(db)
            .await?
            .filter(|p| p.user_id == owner_id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_is_lowercase_substring() {
        assert_eq!(like_pattern("  WiDget "), "%widget%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_search_query_lowercases_name_column() {
        let id = Uuid::new_v4();
        let sql = OwnerScope::Owner(id)
            .apply(product::Entity::find(), product::Column::UserId)
            .filter(Expr::expr(Func::lower(Expr::col(product::Column::Name))).like(like_pattern("Bolt")))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("name")"#));
        assert!(sql.contains("'%bolt%'"));
        assert!(sql.contains(&id.to_string()));
    }

    #[test]
    fn test_price_defaults_to_zero_and_rejects_negative() {
        assert_eq!(checked_price(None).unwrap(), Decimal::ZERO);
        assert_eq!(checked_price(Some(Decimal::new(995, 2))).unwrap(), Decimal::new(995, 2));
        assert!(checked_price(Some(Decimal::new(-1, 0))).is_err());
    }

    fn product_row(owner: Uuid) -> product::Model {
        let now = Utc::now();
        product::Model {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "Widget".to_string(),
            manufacturer: "Acme".to_string(),
            stock: 4,
            price: Decimal::new(995, 2),
            category: DEFAULT_CATEGORY.to_string(),
            description: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sql_log(db: DatabaseConnection) -> Vec<Vec<String>> {
        db.into_transaction_log()
            .iter()
            .map(|txn| txn.statements().iter().map(|s| s.sql.clone()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_delete_removes_purchases_and_sales_in_one_transaction() {
        let owner = Uuid::new_v4();
        let product = product_row(owner);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product.clone()]])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 2 },
                MockExecResult { last_insert_id: 0, rows_affected: 3 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let deleted = ProductService::delete(&db, owner, product.id).await.unwrap();
        assert_eq!(
            deleted,
            DeletedProduct { product_id: product.id, purchases_deleted: 2, sales_deleted: 3 }
        );

        let log = sql_log(db);
        assert_eq!(log.len(), 1);
        let deletes: Vec<&String> = log[0].iter().filter(|s| s.starts_with("DELETE")).collect();
        assert_eq!(deletes.len(), 3);
        assert!(deletes[0].starts_with(r#"DELETE FROM "purchases" WHERE "purchases"."product_id" = $1"#));
        assert!(deletes[1].starts_with(r#"DELETE FROM "sales" WHERE "sales"."product_id" = $1"#));
        assert!(deletes[2].starts_with(r#"DELETE FROM "products""#));
        assert_eq!(log[0].last().map(String::as_str), Some("COMMIT"));
    }

    #[tokio::test]
    async fn test_delete_of_foreign_product_touches_nothing() {
        let product = product_row(Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product.clone()]])
            .into_connection();

        let err = ProductService::delete(&db, Uuid::new_v4(), product.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let log = sql_log(db);
        assert!(!log[0].iter().any(|s| s.starts_with("DELETE")));
        assert_eq!(log[0].last().map(String::as_str), Some("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_guest_scope_lists_every_owner_without_filter() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_row(alice), product_row(bob)]])
            .into_connection();

        let products = ProductService::list(&db, OwnerScope::Guest).await.unwrap();
        let owners: Vec<Uuid> = products.iter().map(|p| p.user_id).collect();
        assert_eq!(owners, vec![alice, bob]);

        let log = sql_log(db);
        assert_eq!(log.len(), 1);
        assert!(!log[0][0].contains("WHERE"));
    }

    #[tokio::test]
    async fn test_owner_scope_lists_with_owner_filter() {
        let owner = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_row(owner)]])
            .into_connection();

        ProductService::list(&db, OwnerScope::Owner(owner)).await.unwrap();

        let log = sql_log(db);
        assert!(log[0][0].contains(r#"WHERE "products"."user_id" = $1"#));
    }
}
