use actix_web::{get, post, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde_json::json;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::dto::{AddProductRequest, SearchQuery, SetStockRequest, UpdateProductRequest};
use crate::models::scope::{parse_record_id, OwnerScope};
use crate::services::ProductService;

/// POST /api/product/add
#[post("/add")]
pub async fn add_product(
    auth_user: AuthUser,
    body: web::Json<AddProductRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let owner_id = auth_user.authorize_write(body.user_id.as_deref())?;

    let product = ProductService::create(db.get_ref(), owner_id, &body).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// GET /api/product/get/{owner}
#[get("/get/{owner}")]
pub async fn get_products(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let products = ProductService::list(db.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/product/delete/{id} - supprime aussi achats et ventes
#[get("/delete/{id}")]
pub async fn delete_product(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let product_id = parse_record_id(&path, "Product")?;
    let owner_id = auth_user.authorize_write(None)?;

    let deleted = ProductService::delete(db.get_ref(), owner_id, product_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Product deleted",
        "productID": deleted.product_id,
        "deletedPurchases": deleted.purchases_deleted,
        "deletedSales": deleted.sales_deleted,
    })))
}

/// POST /api/product/update
#[post("/update")]
pub async fn update_product(
    auth_user: AuthUser,
    body: web::Json<UpdateProductRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let owner_id = auth_user.authorize_write(None)?;

    let product = ProductService::update(db.get_ref(), owner_id, &body).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// PUT /api/product/{id}/stock - édition directe du stock
#[put("/{id}/stock")]
pub async fn set_stock(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<SetStockRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let product_id = parse_record_id(&path, "Product")?;
    let owner_id = auth_user.authorize_write(None)?;

    let product = ProductService::set_stock(db.get_ref(), owner_id, product_id, body.stock).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// GET /api/product/search?searchTerm=... (scope de l'appelant)
#[get("/search")]
pub async fn search_products(
    auth_user: AuthUser,
    query: web::Query<SearchQuery>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let term = query
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Search term is required".to_string()))?;

    let products = ProductService::search(db.get_ref(), auth_user.scope, term).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub fn product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/product")
            .service(add_product)
            .service(get_products)
            .service(delete_product)
            .service(update_product)
            .service(search_products)
            .service(set_stock)
    );
}
