use chrono::{DateTime, Duration, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dto::{RegisterRequest, UpdateProfileRequest};
use crate::models::{password_reset_tokens, users};
use crate::utils::password;

const INVALID_CREDENTIALS: &str = "Invalid Credentials";
const INVALID_RESET_TOKEN: &str = "Password reset token is invalid or has expired";

pub struct UserService;

/// Token de réinitialisation émis
#[derive(Debug, Clone)]
pub struct IssuedResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Emails comparés sans tenir compte de la casse ni des espaces
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Valeur optionnelle non vide (les chaînes vides sont ignorées à la mise à jour)
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// PBKDF2 est coûteux: exécuté hors des workers actix
async fn hash(plain: &str) -> Result<String, AppError> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(AppError::Internal)
}

async fn verify(plain: &str, stored_hash: &str) -> Result<bool, AppError> {
    let plain = plain.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(AppError::Internal)
}

impl UserService {
    /// Inscription: 409 si l'email existe déjà
    pub async fn register(
        db: &DatabaseConnection,
        request: &RegisterRequest,
    ) -> Result<users::Model, AppError> {
        let email = normalize_email(&request.email);

        // 1. Vérifier si l'utilisateur existe déjà
        if Self::find_by_email(db, &email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // 2. Hash le mot de passe
        let password_hash = hash(&request.password).await?;

        // 3. Créer l'utilisateur
        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(request.first_name.trim().to_string()),
            last_name: Set(request.last_name.trim().to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            phone_number: Set(non_empty(&request.phone_number).map(str::to_string)),
            image_url: Set(non_empty(&request.image_url).map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = user.insert(db).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Vérifie email + mot de passe. Même message d'erreur dans tous les cas.
    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        plain_password: &str,
    ) -> Result<users::Model, AppError> {
        let user = Self::find_by_email(db, &normalize_email(email))
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let is_valid = verify(plain_password, &user.password_hash).await?;

        if !is_valid {
            tracing::warn!(user_id = %user.id, "login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    pub async fn find(db: &DatabaseConnection, user_id: Uuid) -> Result<users::Model, AppError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
    }

    /// Met à jour uniquement les champs fournis et non vides
    pub async fn update_profile(
        db: &DatabaseConnection,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<users::Model, AppError> {
        let user = Self::find(db, user_id).await?;
        let mut active: users::ActiveModel = user.into();

        if let Some(first_name) = non_empty(&request.first_name) {
            active.first_name = Set(first_name.to_string());
        }
        if let Some(last_name) = non_empty(&request.last_name) {
            active.last_name = Set(last_name.to_string());
        }
        if let Some(email) = non_empty(&request.email) {
            // L'unicité est garantie par la contrainte UNIQUE (-> 409)
            active.email = Set(normalize_email(email));
        }
        if let Some(phone_number) = non_empty(&request.phone_number) {
            active.phone_number = Set(Some(phone_number.to_string()));
        }
        if let Some(image_url) = non_empty(&request.image_url) {
            active.image_url = Set(Some(image_url.to_string()));
        }
        if let Some(new_password) = non_empty(&request.password) {
            active.password_hash = Set(hash(new_password).await?);
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    pub async fn update_image(
        db: &DatabaseConnection,
        user_id: Uuid,
        image_url: &str,
    ) -> Result<users::Model, AppError> {
        let user = Self::find(db, user_id).await?;
        let mut active: users::ActiveModel = user.into();
        active.image_url = Set(Some(image_url.trim().to_string()));
        active.updated_at = Set(Utc::now());

        Ok(active.update(db).await?)
    }

    /// Génère un token de réinitialisation valable `ttl_minutes`
    pub async fn forgot_password(
        db: &DatabaseConnection,
        email: &str,
        ttl_minutes: i64,
    ) -> Result<IssuedResetToken, AppError> {
        // 1. Trouver l'utilisateur
        let user = Self::find_by_email(db, &normalize_email(email))
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No account with that email address exists".to_string())
            })?;

        // 2. Créer le token
        let now = Utc::now();
        let issued = IssuedResetToken {
            token: Uuid::new_v4().simple().to_string(),
            expires_at: now + Duration::minutes(ttl_minutes),
        };

        let reset_token = password_reset_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            token: Set(issued.token.clone()),
            expires_at: Set(issued.expires_at),
            used: Set(false),
            created_at: Set(now),
        };
        reset_token.insert(db).await?;

        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "password reset token issued");
        Ok(issued)
    }

    /// Retourne l'email associé à un token encore utilisable
    pub async fn verify_reset_token(db: &DatabaseConnection, token: &str) -> Result<String, AppError> {
        let reset_token = Self::usable_token(db, token).await?;
        let user = Self::find(db, reset_token.user_id).await?;
        Ok(user.email)
    }

    /// Consomme le token et change le mot de passe (atomique)
    pub async fn reset_password(
        db: &DatabaseConnection,
        token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let password_hash = hash(new_password).await?;
        let txn = db.begin().await?;

        // 1. Verrouiller le token pour qu'il ne serve qu'une fois
        let reset_token = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .lock_exclusive()
            .one(&txn)
            .await?
            .filter(|t| t.is_usable(Utc::now()))
            .ok_or_else(|| AppError::Validation(INVALID_RESET_TOKEN.to_string()))?;

        // 2. Changer le mot de passe
        let user = users::Entity::find_by_id(reset_token.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Validation(INVALID_RESET_TOKEN.to_string()))?;
        let user_id = user.id;
        let mut active_user: users::ActiveModel = user.into();
        active_user.password_hash = Set(password_hash);
        active_user.updated_at = Set(Utc::now());
        active_user.update(&txn).await?;

        // 3. Marquer le token comme utilisé
        let mut active_token: password_reset_tokens::ActiveModel = reset_token.into();
        active_token.used = Set(true);
        active_token.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(user_id = %user_id, "password reset");
        Ok(())
    }

    async fn usable_token(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<password_reset_tokens::Model, AppError> {
        password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .one(db)
            .await?
            .filter(|t| t.is_usable(Utc::now()))
            .ok_or_else(|| AppError::Validation(INVALID_RESET_TOKEN.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_non_empty_skips_blank_values() {
        assert_eq!(non_empty(&Some("  ".to_string())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some(" Bob ".to_string())), Some("Bob"));
    }
}
