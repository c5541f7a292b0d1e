use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::AddStoreRequest;
use crate::models::scope::OwnerScope;
use crate::services::StoreService;

#[post("/add")]
pub async fn add_store(
    auth_user: AuthUser,
    body: web::Json<AddStoreRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let owner_id = auth_user.authorize_write(body.user_id.as_deref())?;

    let store = StoreService::create(db.get_ref(), owner_id, &body).await?;
    Ok(HttpResponse::Ok().json(store))
}

#[get("/get/{owner}")]
pub async fn get_stores(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let stores = StoreService::list(db.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(stores))
}

pub fn store_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/store")
            .service(add_store)
            .service(get_stores)
    );
}
