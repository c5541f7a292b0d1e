mod config;
mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod telemetry;
mod utils;

use actix_web::{web, App, HttpServer};
use std::io;

use crate::config::AppConfig;
use crate::middleware::RequestLogger;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!("connecting to database");
    let db = db::establish_connection(&config).await.map_err(|e| {
        tracing::error!(error = %e, "failed to connect to database");
        io::Error::new(io::ErrorKind::ConnectionRefused, e)
    })?;

    db::ensure_schema(&db).await.map_err(|e| {
        tracing::error!(error = %e, "failed to create tables");
        io::Error::other(e)
    })?;
    tracing::info!("database ready");

    let bind = (config.host.clone(), config.port);
    tracing::info!(host = %bind.0, port = bind.1, "starting server");

    let db = web::Data::new(db);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(db.clone())
            .app_data(config.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await
}
