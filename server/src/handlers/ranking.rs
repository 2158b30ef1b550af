use crate::db::Db;
use crate::error::AppError;
use crate::models::ranking::MessageResponse;
use crate::services::ranking as service;
use crate::validation;
use log::info;
use ntex::util::Bytes;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

/// Registers the ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/ranking", web::get().to(get_ranking))
        .route("/api/salvar", web::post().to(save_time));
}

pub async fn get_ranking(db: web::types::State<Arc<Db>>) -> Result<HttpResponse, AppError> {
    info!("GET /api/ranking");
    let entries = service::fetch_top_rankings(&db)?;
    Ok(HttpResponse::Ok().json(&entries))
}

pub async fn save_time(
    db: web::types::State<Arc<Db>>,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    info!("POST /api/salvar");
    let sub = validation::parse_submission(&body)?;
    let outcome = service::submit_time(&db, &sub)?;
    info!("Saved time {} for {} ({:?})", sub.tempo, sub.nome, outcome);
    Ok(HttpResponse::build(outcome.status()).json(&MessageResponse::from(outcome)))
}
