use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::errors::AppResult;
use crate::middleware::AuthUser;
use crate::models::dto::{
    AddSaleRequest, MonthlyQuery, MonthlySalesResponse, MovementResponse, TotalSaleAmountResponse,
};
use crate::models::scope::OwnerScope;
use crate::services::{AggregationService, SaleService};

/// POST /api/sales/add - vente + décrément du stock (refusée si stock insuffisant)
#[post("/add")]
pub async fn add_sale(
    auth_user: AuthUser,
    body: web::Json<AddSaleRequest>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let owner_id = auth_user.authorize_write(body.user_id.as_deref())?;

    let (sale, product) = SaleService::create(db.get_ref(), owner_id, &body).await?;
    Ok(HttpResponse::Ok().json(MovementResponse {
        record: sale,
        product_stock: product.stock,
    }))
}

/// GET /api/sales/get/{owner}
#[get("/get/{owner}")]
pub async fn get_sales(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let sales = SaleService::list(db.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(sales))
}

/// GET /api/sales/get/{owner}/totalsaleamount
#[get("/get/{owner}/totalsaleamount")]
pub async fn get_total_sale_amount(
    auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let scope = OwnerScope::parse(&path)?;
    auth_user.authorize_read(&scope)?;

    let total = AggregationService::total_sale_amount(db.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(TotalSaleAmountResponse {
        total_sale_amount: total,
    }))
}

/// GET /api/sales/getmonthly?year=YYYY
#[get("/getmonthly")]
pub async fn get_monthly_sales(
    auth_user: AuthUser,
    query: web::Query<MonthlyQuery>,
    db: web::Data<DatabaseConnection>,
) -> AppResult<HttpResponse> {
    let buckets = AggregationService::monthly_sales(db.get_ref(), auth_user.scope, query.year).await?;
    Ok(HttpResponse::Ok().json(MonthlySalesResponse {
        sales_amount: buckets.to_vec(),
    }))
}

pub fn sales_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sales")
            .service(add_sale)
            .service(get_monthly_sales)
            .service(get_sales)
            .service(get_total_sale_amount)
    );
}
