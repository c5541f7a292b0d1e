// ============================================================================
// OWNER SCOPE
// ============================================================================
//
// Description:
//   Chaque route de lecture reçoit un identifiant de propriétaire dans l'URL
//   (ex: /api/product/get/{owner}). Deux formes possibles:
//     - un UUID d'utilisateur -> filtre user_id = UUID
//     - la sentinelle "guest-user-id" -> AUCUN filtre (mode démo, lit tout)
//
// Points d'attention:
//   - La validité d'un identifiant = parse UUID (plus de test de longueur)
//   - Le mode invité est en lecture seule (voir middleware::AuthUser)
//
// ============================================================================

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};
use std::fmt;
use uuid::Uuid;

use crate::errors::AppError;

pub const GUEST_USER_ID: &str = "guest-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerScope {
    Guest,
    Owner(Uuid),
}

impl OwnerScope {
    /// Parse un segment d'URL en scope
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }
        if raw == GUEST_USER_ID {
            return Ok(OwnerScope::Guest);
        }

        Uuid::parse_str(raw)
            .map(OwnerScope::Owner)
            .map_err(|_| AppError::Validation("Invalid User ID format".to_string()))
    }

    /// Applique le filtre propriétaire à une requête (rien pour un invité)
    pub fn apply<E, C>(&self, select: Select<E>, column: C) -> Select<E>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        match self {
            OwnerScope::Guest => select,
            OwnerScope::Owner(id) => select.filter(column.eq(*id)),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, OwnerScope::Guest)
    }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerScope::Guest => f.write_str(GUEST_USER_ID),
            OwnerScope::Owner(id) => write!(f, "{}", id),
        }
    }
}

/// Parse un identifiant d'enregistrement (produit, magasin, ...)
pub fn parse_record_id(raw: &str, label: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(format!("{} ID is required", label)));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {} ID format", label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_parse_guest_sentinel() {
        assert_eq!(OwnerScope::parse("guest-user-id").unwrap(), OwnerScope::Guest);
    }

    #[test]
    fn test_parse_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(OwnerScope::parse(&id.to_string()).unwrap(), OwnerScope::Owner(id));
    }

    #[test]
    fn test_parse_rejects_mongo_style_ids() {
        // 24 caractères hex: l'ancien format n'est plus accepté
        let err = OwnerScope::parse("6429979b2e5434138eda1564").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Invalid User ID format"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(OwnerScope::parse("  "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_guest_scope_does_not_filter() {
        let sql = OwnerScope::Guest
            .apply(product::Entity::find(), product::Column::UserId)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_owner_scope_filters_on_owner_column() {
        let id = Uuid::new_v4();
        let sql = OwnerScope::Owner(id)
            .apply(product::Entity::find(), product::Column::UserId)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"WHERE "products"."user_id" ="#));
        assert!(sql.contains(&id.to_string()));
    }

    #[test]
    fn test_parse_record_id_labels_the_error() {
        let err = parse_record_id("abc", "Product").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Invalid Product ID format"));
    }
}
