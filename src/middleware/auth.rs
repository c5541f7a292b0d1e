use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::scope::{parse_record_id, OwnerScope};
use crate::utils::jwt;

/// Identité de l'appelant, extraite du JWT à chaque requête
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub scope: OwnerScope,
    pub email: String,
}

impl AuthUser {
    /// Vérifie que l'appelant peut lire le scope demandé dans l'URL.
    /// Le scope invité est lisible par tout appelant authentifié.
    pub fn authorize_read(&self, requested: &OwnerScope) -> Result<(), AppError> {
        match (requested, &self.scope) {
            (OwnerScope::Guest, _) => Ok(()),
            (OwnerScope::Owner(id), OwnerScope::Owner(own)) if id == own => Ok(()),
            _ => {
                tracing::warn!(requested = %requested, caller = %self.scope, "read outside caller scope");
                Err(AppError::Forbidden(
                    "You can only access your own records".to_string(),
                ))
            }
        }
    }

    /// Retourne l'id du propriétaire pour une écriture.
    /// `claimed` est l'id éventuellement envoyé dans le corps de la requête.
    pub fn authorize_write(&self, claimed: Option<&str>) -> Result<Uuid, AppError> {
        let own = match self.scope {
            OwnerScope::Owner(id) => id,
            OwnerScope::Guest => {
                tracing::warn!(email = %self.email, "guest write rejected");
                return Err(AppError::Forbidden("Guest accounts are read-only".to_string()));
            }
        };

        if let Some(raw) = claimed {
            let claimed = parse_record_id(raw, "User")?;
            if claimed != own {
                return Err(AppError::Forbidden(
                    "You can only modify your own records".to_string(),
                ));
            }
        }

        Ok(own)
    }
}

/// Extrait l'utilisateur à partir du header "Authorization: Bearer <token>"
fn extract(req: &HttpRequest) -> Result<AuthUser, AppError> {
    // 1. Extraire le header Authorization
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    // 2. Convertir le header en string
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    // 3. Extraire le token (format: "Bearer <token>")
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid Authorization format (expected: Bearer <token>)".to_string())
    })?;

    // 4. Vérifier le token JWT avec le secret de la configuration
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| AppError::Internal("AppConfig is not registered".to_string()))?;
    let claims = jwt::verify_token(&config.jwt_secret, token).map_err(AppError::Unauthorized)?;

    // 5. Le sujet doit être cohérent avec le flag invité
    let scope = OwnerScope::parse(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;
    if scope.is_guest() != claims.guest {
        return Err(AppError::Unauthorized("Invalid token subject".to_string()));
    }

    Ok(AuthUser {
        scope,
        email: claims.email,
    })
}

/// Implémentation de FromRequest pour AuthUser
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req).map_err(Error::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config(secret: &str) -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://localhost/inventory_test".to_string()),
            "JWT_SECRET" => Some(secret.to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn bearer(token: &str, secret: &str) -> HttpRequest {
        TestRequest::default()
            .app_data(web::Data::new(config(secret)))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request()
    }

    fn owner(id: Uuid) -> AuthUser {
        AuthUser {
            scope: OwnerScope::Owner(id),
            email: "owner@example.com".to_string(),
        }
    }

    fn guest() -> AuthUser {
        AuthUser {
            scope: OwnerScope::Guest,
            email: "guest@example.com".to_string(),
        }
    }

    #[test]
    fn test_owner_reads_own_scope_and_guest_scope() {
        let id = Uuid::new_v4();
        let user = owner(id);

        assert!(user.authorize_read(&OwnerScope::Owner(id)).is_ok());
        assert!(user.authorize_read(&OwnerScope::Guest).is_ok());
        assert!(matches!(
            user.authorize_read(&OwnerScope::Owner(Uuid::new_v4())),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_guest_cannot_read_a_specific_owner() {
        assert!(guest().authorize_read(&OwnerScope::Owner(Uuid::new_v4())).is_err());
        assert!(guest().authorize_read(&OwnerScope::Guest).is_ok());
    }

    #[test]
    fn test_guest_cannot_write() {
        assert!(matches!(guest().authorize_write(None), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_write_checks_claimed_owner() {
        let id = Uuid::new_v4();
        let user = owner(id);

        assert_eq!(user.authorize_write(None).unwrap(), id);
        assert_eq!(user.authorize_write(Some(&id.to_string())).unwrap(), id);
        assert!(matches!(
            user.authorize_write(Some(&Uuid::new_v4().to_string())),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            user.authorize_write(Some("not-a-uuid")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_valid_token() {
        let id = Uuid::new_v4();
        let token = jwt::generate_token("k1", &id.to_string(), "owner@example.com", false, 1).unwrap();
        let req = bearer(&token, "k1");

        let user = extract(&req).unwrap();
        assert_eq!(user.scope, OwnerScope::Owner(id));
        assert_eq!(user.email, "owner@example.com");
    }

    #[test]
    fn test_extract_rejects_missing_or_malformed_header() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(extract(&req), Err(AppError::Unauthorized(_))));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Token abc"))
            .to_http_request();
        assert!(matches!(extract(&req), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_extract_rejects_guest_flag_mismatch() {
        // Un token "invité" forgé avec un vrai UUID ne doit pas passer
        let token = jwt::generate_token("k1", &Uuid::new_v4().to_string(), "x@example.com", true, 1).unwrap();
        let req = bearer(&token, "k1");

        assert!(matches!(extract(&req), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_extract_uses_configured_secret() {
        let token = jwt::generate_token("k1", &Uuid::new_v4().to_string(), "owner@example.com", false, 1).unwrap();

        assert!(matches!(extract(&bearer(&token, "k2")), Err(AppError::Unauthorized(_))));

        // sans AppConfig enregistrée: erreur serveur, pas un accès accordé
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();
        assert!(matches!(extract(&req), Err(AppError::Internal(_))));
    }
}
