use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde_json::json;
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::{
    ForgotPasswordRequest, ResetPasswordRequest, UpdateImageRequest, UpdateProfileRequest,
    UserProfile,
};
use crate::models::scope::OwnerScope;
use crate::services::UserService;

/// GET /api/user/profile/{userId} (PROTÉGÉE)
#[get("/profile/{user_id}")]
pub async fn get_profile(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let profile = match scope {
        OwnerScope::Guest => UserProfile::guest(),
        OwnerScope::Owner(id) => UserProfile::from(UserService::find(db.get_ref(), id).await?),
    };

    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/user/profile/{userId} (PROTÉGÉE)
#[put("/profile/{user_id}")]
pub async fn update_profile(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let user_id = auth_user.authorize_write(Some(path.as_str()))?;

    let user = UserService::update_profile(db.get_ref(), user_id, &body).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

/// PUT /api/user/profile/{userId}/image (PROTÉGÉE)
#[put("/profile/{user_id}/image")]
pub async fn update_profile_image(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateImageRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let user_id = auth_user.authorize_write(Some(path.as_str()))?;

    let user = UserService::update_image(db.get_ref(), user_id, &body.image_url).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile image updated successfully",
        "imageUrl": user.image_url,
    })))
}

/// POST /api/user/forgot-password (PUBLIC)
/// Pas de service mail: le token est renvoyé dans la réponse
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    let issued =
        UserService::forgot_password(db.get_ref(), &body.email, config.reset_token_ttl_minutes).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Password reset token generated successfully",
        "token": issued.token,
        "expiresAt": issued.expires_at,
    })))
}

/// POST /api/user/reset-password (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;

    UserService::reset_password(db.get_ref(), &body.token, &body.password).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Password has been reset successfully" })))
}

/// GET /api/user/verify-reset-token/{token} (PUBLIC)
#[get("/verify-reset-token/{token}")]
pub async fn verify_reset_token(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let email = UserService::verify_reset_token(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Token is valid", "email": email })))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(get_profile)
            .service(update_profile)
            .service(update_profile_image)
            .service(forgot_password)
            .service(reset_password)
            .service(verify_reset_token)
    );
}
