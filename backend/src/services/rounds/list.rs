use crate::db::RoundStore;
use crate::services::error_body;
use actix_web::{web, HttpResponse, Responder};
use common::model::round::Round;
use common::requests::RoundsQuery;
use log::error;
use serde_json::json;

/// Actix handler for `GET /api/rounds?userId=...`.
///
/// # Returns
/// - `200 OK` with `{ "rounds": [...] }`.
/// - `400 Bad Request` when `userId` is missing or blank.
/// - `500 Internal Server Error` if the store cannot be read.
pub async fn process(
    query: web::Query<RoundsQuery>,
    store: web::Data<dyn RoundStore>,
) -> impl Responder {
    let user_id = match query.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return HttpResponse::BadRequest()
                .json(error_body("invalid_request", "Missing userId query param"))
        }
    };

    match list_rounds(store, user_id).await {
        Ok(rounds) => HttpResponse::Ok().json(json!({ "rounds": rounds })),
        Err(e) => {
            error!("Error fetching rounds: {}", e);
            HttpResponse::InternalServerError().json(error_body("persistence", "Error fetching rounds"))
        }
    }
}

async fn list_rounds(store: web::Data<dyn RoundStore>, user_id: String) -> Result<Vec<Round>, String> {
    let store = store.into_inner();
    tokio::task::spawn_blocking(move || store.list_rounds(&user_id))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}
