pub mod auth;
pub mod health;
pub mod product;
pub mod purchase;
pub mod sales;
pub mod store;
pub mod user;

use actix_web::{web, HttpResponse};

use crate::errors::AppError;

/// GET / - bannière d'accueil
pub async fn welcome() -> HttpResponse {
    HttpResponse::Ok().body("Welcome to the Inventory Management System API")
}

/// Corps JSON illisible -> 400 { error: "Invalid JSON", details }
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::InvalidJson(err.to_string()).into())
}

/// Query string illisible (ex: ?year=abc) -> 400
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(welcome)).service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(product::product_routes)
            .configure(purchase::purchase_routes)
            .configure(sales::sales_routes)
            .configure(store::store_routes)
            .configure(user::user_routes)
    );
}
