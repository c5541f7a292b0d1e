use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::dto::{LoginRequest, RegisterRequest, SessionResponse, UserProfile};
use crate::models::scope::{OwnerScope, GUEST_USER_ID};
use crate::services::UserService;
use crate::utils::jwt;

/// JWT pour un utilisateur enregistré
fn session_for(profile: UserProfile, config: &AppConfig) -> AppResult<SessionResponse> {
    let token = jwt::generate_token(
        &config.jwt_secret,
        &profile.id,
        &profile.email,
        profile.is_guest,
        config.jwt_ttl_hours,
    )
    .map_err(AppError::Internal)?;
    Ok(SessionResponse { user: profile, token })
}

/// POST /api/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let user = UserService::register(db.get_ref(), &body).await?;
    let session = session_for(UserProfile::from(user), &config)?;

    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let user = UserService::authenticate(db.get_ref(), &body.email, &body.password).await?;
    let session = session_for(UserProfile::from(user), &config)?;

    Ok(HttpResponse::Ok().json(session))
}

/// GET /api/login - Utilisateur du token (PROTÉGÉE)
#[get("/login")]
pub async fn current_user(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let profile = match auth_user.scope {
        OwnerScope::Guest => UserProfile::guest(),
        OwnerScope::Owner(id) => UserProfile::from(UserService::find(db.get_ref(), id).await?),
    };

    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/guest-login - Session invitée en lecture seule (PUBLIC)
#[get("/guest-login")]
pub async fn guest_login(config: web::Data<AppConfig>) -> AppResult<HttpResponse> {
    let session = session_for(UserProfile::guest(), &config)?;
    tracing::info!(subject = GUEST_USER_ID, "guest session issued");

    Ok(HttpResponse::Ok().json(session))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(current_user)
        .service(guest_login);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    fn test_config() -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://localhost/inventory_test".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[actix_web::test]
    async fn test_guest_login_returns_guest_profile_and_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(web::scope("/api").configure(auth_routes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/guest-login").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["_id"], "guest-user-id");
        assert_eq!(body["firstName"], "Guest");
        assert_eq!(body["lastName"], "User");
        assert_eq!(body["email"], "guest@example.com");
        assert_eq!(body["isGuest"], true);

        let claims = jwt::verify_token(&test_config().jwt_secret, body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.sub, GUEST_USER_ID);
        assert!(claims.guest);
    }

    #[actix_web::test]
    async fn test_current_user_requires_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_config()))
                .service(web::scope("/api").configure(auth_routes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/login").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
