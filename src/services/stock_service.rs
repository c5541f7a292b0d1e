/*
services/
├─ stock_service.rs       ← trait StockMovement + transaction (ligne + stock)
├─ purchase_service.rs    ← achat  = mouvement +quantité
├─ sale_service.rs        ← vente  = mouvement -quantité
└─ aggregation.rs         ← totaux et totaux mensuels

Une ligne d'achat/vente et l'ajustement du stock sont TOUJOURS écrits dans
la même transaction: si l'un échoue, rien n'est persisté.
*/
use async_trait::async_trait;
use rust_decimal::Decimal;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product;
use crate::utils::money;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("Insufficient stock: {available} available, {requested} requested")]
    Insufficient { available: i32, requested: i32 },

    #[error("Stock cannot be negative")]
    Negative,

    #[error("Stock quantity is too large")]
    Overflow,
}

/// Applique un delta signé à un stock.
/// Une sortie (delta < 0) plus grande que le stock est refusée.
pub fn apply_delta(stock: i32, delta: i32) -> Result<i32, StockError> {
    let next = stock.checked_add(delta).ok_or(StockError::Overflow)?;
    if next < 0 {
        return Err(StockError::Insufficient {
            available: stock,
            requested: delta.checked_neg().unwrap_or(i32::MAX),
        });
    }
    Ok(next)
}

/// Valide une valeur de stock saisie directement
pub fn validate_stock(stock: i32) -> Result<i32, StockError> {
    if stock < 0 {
        return Err(StockError::Negative);
    }
    Ok(stock)
}

/// Date d'un mouvement, aujourd'hui si absente.
/// Formats acceptés: "2024-03-10" ou un timestamp RFC 3339 complet.
pub fn movement_date(raw: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    let Some(value) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Utc::now().date_naive());
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|ts| ts.date_naive()))
        .map_err(|_| AppError::Validation(format!("{} must be a valid date (YYYY-MM-DD)", field)))
}

/// Montant total d'un mouvement: celui fourni, sinon quantité x prix unitaire.
/// Le résultat reste dans [0, max_amount()].
pub fn movement_total(
    provided: Option<Decimal>,
    unit_price: Decimal,
    quantity: i32,
) -> Result<Decimal, AppError> {
    let amount = match provided {
        Some(amount) => amount,
        None => money::checked_line_total(unit_price, quantity)
            .ok_or_else(|| AppError::Validation("Total amount is too large".to_string()))?,
    };
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::Validation("Total amount cannot be negative".to_string()));
    }
    if amount > money::max_amount() {
        return Err(AppError::Validation("Total amount is too large".to_string()));
    }
    Ok(amount)
}

/// Un événement qui crée une ligne de registre ET modifie le stock d'un produit
#[async_trait]
pub trait StockMovement: Send + Sync {
    type Record: Send;

    /// Produit concerné
    fn product_id(&self) -> Uuid;

    /// Variation signée du stock (+ achat, - vente)
    fn delta(&self) -> i32;

    /// Insère la ligne de registre. Le produit est déjà verrouillé et ajusté.
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        owner_id: Uuid,
        product: &product::Model,
    ) -> Result<Self::Record, AppError>;
}

/// Charge le produit (verrou FOR UPDATE), vérifie le propriétaire, applique le delta
pub async fn adjust<C>(
    conn: &C,
    owner_id: Uuid,
    product_id: Uuid,
    delta: i32,
) -> Result<product::Model, AppError>
where
    C: ConnectionTrait,
{
    // 1. Verrouiller la ligne produit jusqu'à la fin de la transaction
    let product = product::Entity::find_by_id(product_id)
        .lock_exclusive()
        .one(conn)
        .await?
        .filter(|p| p.user_id == owner_id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    // 2. Calculer le nouveau stock
    let stock = apply_delta(product.stock, delta)?;

    // 3. Persister
    let mut active: product::ActiveModel = product.into();
    active.stock = Set(stock);
    active.updated_at = Set(Utc::now());

    Ok(active.update(conn).await?)
}

/// Enregistre un mouvement de stock de façon atomique.
/// Retourne la ligne créée et le produit après ajustement.
pub async fn record<M>(
    db: &DatabaseConnection,
    owner_id: Uuid,
    movement: M,
) -> Result<(M::Record, product::Model), AppError>
where
    M: StockMovement,
{
    let txn = db.begin().await?;

    // En cas d'erreur, txn est droppée sans commit -> rollback
    let product = adjust(&txn, owner_id, movement.product_id(), movement.delta()).await?;
    let record = movement.insert(&txn, owner_id, &product).await?;

    txn.commit().await?;

    tracing::info!(
        product_id = %product.id,
        delta = movement.delta(),
        stock = product.stock,
        "stock adjusted"
    );

    Ok((record, product))
}

/// Édition directe du stock (inventaire physique, correction)
pub async fn set_stock(
    db: &DatabaseConnection,
    owner_id: Uuid,
    product_id: Uuid,
    stock: i32,
) -> Result<product::Model, AppError> {
    let stock = validate_stock(stock)?;

    let txn = db.begin().await?;
    let product = product::Entity::find_by_id(product_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .filter(|p| p.user_id == owner_id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let previous = product.stock;
    let mut active: product::ActiveModel = product.into();
    active.stock = Set(stock);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(product_id = %updated.id, previous, stock, "stock edited");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_then_sales_follow_the_ledger() {
        // stock=0, achat 5 -> 5, vente 2 -> 3
        let stock = apply_delta(0, 5).unwrap();
        assert_eq!(stock, 5);
        let stock = apply_delta(stock, -2).unwrap();
        assert_eq!(stock, 3);

        // vente 10 -> refusée, le stock reste 3
        let err = apply_delta(stock, -10).unwrap_err();
        assert_eq!(err, StockError::Insufficient { available: 3, requested: 10 });
    }

    #[test]
    fn test_selling_exact_stock_reaches_zero() {
        assert_eq!(apply_delta(7, -7).unwrap(), 0);
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(apply_delta(i32::MAX, 1).unwrap_err(), StockError::Overflow);
    }

    #[test]
    fn test_movement_date_defaults_to_today() {
        assert_eq!(movement_date(None, "purchaseDate").unwrap(), Utc::now().date_naive());
        assert_eq!(movement_date(Some("  "), "purchaseDate").unwrap(), Utc::now().date_naive());
    }

    #[test]
    fn test_movement_date_parses_day_and_iso_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(movement_date(Some("2024-03-10"), "saleDate").unwrap(), expected);
        assert_eq!(movement_date(Some("2024-03-10T08:30:00.000Z"), "saleDate").unwrap(), expected);
        assert_eq!(movement_date(Some("2024-03-10T23:30:00+02:00"), "saleDate").unwrap(), expected);
        assert!(matches!(
            movement_date(Some("10/03/2024"), "saleDate"),
            Err(AppError::Validation(msg)) if msg.starts_with("saleDate")
        ));
    }

    #[test]
    fn test_movement_date_rejects_trailing_characters() {
        for raw in ["2024-03-10xyz", "2024-03-10T", "2024-03-10T08:30:00junk"] {
            assert!(movement_date(Some(raw), "purchaseDate").is_err(), "{raw}");
        }
        // les espaces autour restent tolérés
        assert!(movement_date(Some(" 2024-03-10 "), "purchaseDate").is_ok());
    }

    #[test]
    fn test_movement_total_defaults_to_quantity_times_price() {
        let price = Decimal::new(1250, 2);
        assert_eq!(movement_total(None, price, 4).unwrap(), Decimal::new(5000, 2));
        assert_eq!(movement_total(Some(Decimal::from(42)), price, 4).unwrap(), Decimal::from(42));
        assert!(movement_total(Some(Decimal::from(-1)), price, 4).is_err());
    }

    #[test]
    fn test_movement_total_too_large_is_a_validation_error() {
        // prix 5e28 x 2 dépasse Decimal::MAX
        let huge_price = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        assert!(matches!(
            movement_total(None, huge_price, 2),
            Err(AppError::Validation(msg)) if msg == "Total amount is too large"
        ));

        // produit calculable mais au-dessus du plafond
        assert!(movement_total(None, money::max_amount(), 2).is_err());
        assert!(movement_total(Some(money::max_amount() + Decimal::ONE), Decimal::ZERO, 1).is_err());
        assert_eq!(movement_total(Some(money::max_amount()), Decimal::ZERO, 1).unwrap(), money::max_amount());
    }

    #[test]
    fn test_direct_edit_rejects_negative() {
        assert_eq!(validate_stock(-1).unwrap_err(), StockError::Negative);
        assert_eq!(validate_stock(0).unwrap(), 0);
    }
}
