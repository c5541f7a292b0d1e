// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Comptes (email + mot de passe hashé)
//   - password_reset_tokens : Tokens de reset password
//   - product : Produits d'un propriétaire (stock, prix, ...)
//   - purchase : Achats (augmentent le stock)
//   - sale : Ventes (diminuent le stock)
//   - store : Magasins d'un propriétaire
//   - scope : Filtre propriétaire / mode invité
//   - dto : Data Transfer Objects pour les requêtes et réponses API
//
// Points d'attention:
//   - Tous les identifiants sont des UUID v4
//   - Les tables sont créées au démarrage si absentes (voir db.rs)
//
// ============================================================================

pub mod health;
pub mod users;
pub mod password_reset_tokens;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod store;
pub mod scope;
pub mod dto;
