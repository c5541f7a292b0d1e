use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::{
    AddPurchaseRequest, MonthlyPurchasesResponse, MonthlyQuery, MovementResponse,
    TotalPurchaseAmountResponse,
};
use crate::models::scope::OwnerScope;
use crate::services::{AggregationService, PurchaseService};

/// POST /api/purchase/add - achat + incrément du stock (atomique)
#[post("/add")]
pub async fn add_purchase(
    auth_user: AuthUser,
    body: web::Json<AddPurchaseRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let owner_id = auth_user.authorize_write(body.user_id.as_deref())?;

    let (purchase, product) = PurchaseService::create(db.get_ref(), owner_id, &body).await?;
    Ok(HttpResponse::Ok().json(MovementResponse {
        record: purchase,
        product_stock: product.stock,
    }))
}

/// GET /api/purchase/get/{owner}
#[get("/get/{owner}")]
pub async fn get_purchases(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let purchases = PurchaseService::list(db.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(purchases))
}

/// GET /api/purchase/get/{owner}/totalpurchaseamount
#[get("/get/{owner}/totalpurchaseamount")]
pub async fn get_total_purchase_amount(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let total = AggregationService::total_purchase_amount(db.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(TotalPurchaseAmountResponse {
        total_purchase_amount: total,
    }))
}

/// GET /api/purchase/getmonthly?year=YYYY
#[get("/getmonthly")]
pub async fn get_monthly_purchases(
    auth_user: AuthUser,
    query: web::Query<MonthlyQuery>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let buckets = AggregationService::monthly_purchases(db.get_ref(), auth_user.scope, query.year).await?;
    Ok(HttpResponse::Ok().json(MonthlyPurchasesResponse {
        purchase_amount: buckets.to_vec(),
    }))
}

pub fn purchase_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/purchase")
            .service(add_purchase)
            .service(get_monthly_purchases)
            .service(get_purchases)
            .service(get_total_purchase_amount)
    );
}
