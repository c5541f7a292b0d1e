// ============================================================================
// MODÈLE : PASSWORD RESET TOKENS
// ============================================================================
//
// Colonnes de la table password_reset_tokens:
//   - id (UUID, PRIMARY KEY)
//   - user_id (UUID, NOT NULL, FK vers users)
//   - token (VARCHAR, UNIQUE, NOT NULL) - UUID v4 simple (32 hex)
//   - expires_at (TIMESTAMPTZ, NOT NULL) - created_at + RESET_TOKEN_TTL_MINUTES
//   - used (BOOLEAN, DEFAULT FALSE, NOT NULL)
//   - created_at (TIMESTAMPTZ)
//
// Workflow:
//   1. User demande reset via POST /api/user/forgot-password
//   2. Backend génère un token et l'insère dans cette table
//   3. Frontend vérifie le lien via GET /api/user/verify-reset-token/{token}
//   4. Frontend envoie POST /api/user/reset-password avec token + nouveau password
//   5. Backend vérifie: token existe, not expired, not used
//   6. Backend change le password et met used = true
//
// Points d'attention:
//   - Un token ne peut être utilisé qu'une fois (used = true)
//   - ON DELETE CASCADE: si user supprimé, tokens supprimés aussi
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTimeUtc,

    pub used: bool,

    pub created_at: DateTimeUtc,
}

impl Model {
    /// Token utilisable: pas encore consommé et pas expiré à `now`
    pub fn is_usable(&self, now: DateTimeUtc) -> bool {
        !self.used && self.expires_at > now
    }
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn token(expires_in_minutes: i64, used: bool) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token: "abc".to_string(),
            expires_at: now + Duration::minutes(expires_in_minutes),
            used,
            created_at: now,
        }
    }

    #[test]
    fn test_fresh_token_is_usable() {
        assert!(token(60, false).is_usable(Utc::now()));
    }

    #[test]
    fn test_used_or_expired_token_is_not_usable() {
        assert!(!token(60, true).is_usable(Utc::now()));
        assert!(!token(-1, false).is_usable(Utc::now()));
    }
}
