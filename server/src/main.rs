mod config;
mod db;
mod error;
mod handlers;
mod logging;
mod models;
mod services;
mod validation;

use config::Config;
use db::Db;
use log::{error, info};
use ntex::web;
use ntex_cors::Cors;
use std::sync::Arc;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_env();
    logging::setup(config.logging_level);

    let db = match Db::open(&config.database_path) {
        Ok(db) => Arc::new(db),
        Err(err) => {
            error!("Failed to open database at {}: {}", config.database_path, err);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
        }
    };
    info!("Database ready at {} (table corrida_ranking)", config.database_path);

    let address = config.bind_address();
    info!("Memory ranking server starting on {}", address);

    web::HttpServer::new(move || {
        web::App::new()
            .state(db.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .route("/api/health", web::get().to(health))
            .configure(handlers::ranking::configure)
    })
    .bind(address)?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
