use crate::db::{NewRound, RoundStore};
use crate::services::error_body;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use common::model::round::{Round, RoundSource};
use common::requests::CreateRoundRequest;
use log::{error, info};
use serde_json::json;

/// Actix handler for `POST /api/rounds`.
///
/// # Returns
/// - `201 Created` with `{ "round": ... }`.
/// - `400 Bad Request` when `userId` or `courseName` is missing or blank.
/// - `500 Internal Server Error` if the round cannot be stored.
pub async fn process(
    payload: web::Json<CreateRoundRequest>,
    store: web::Data<dyn RoundStore>,
) -> impl Responder {
    let new_round = match manual_round(payload.into_inner()) {
        Ok(round) => round,
        Err(message) => return HttpResponse::BadRequest().json(error_body("invalid_request", message)),
    };

    match create_round(store, new_round).await {
        Ok(round) => {
            info!("Created manual round {} for user {}", round.id, round.user_id);
            HttpResponse::Created().json(json!({ "round": round }))
        }
        Err(e) => {
            error!("Error creating round: {}", e);
            HttpResponse::InternalServerError().json(error_body("persistence", "Error creating round"))
        }
    }
}

/// Validates the request and fills in the manual-entry defaults.
fn manual_round(req: CreateRoundRequest) -> Result<NewRound, &'static str> {
    let user_id = req.user_id.as_deref().map(str::trim).unwrap_or("");
    let course_name = req.course_name.as_deref().map(str::trim).unwrap_or("");
    if user_id.is_empty() || course_name.is_empty() {
        return Err("userId and courseName are required");
    }

    Ok(NewRound {
        user_id: user_id.to_string(),
        course_name: course_name.to_string(),
        layout_name: req.layout_name,
        start_time: Some(Utc::now()),
        end_time: None,
        total_strokes: None,
        score_vs_par: None,
        round_rating: None,
        holes_count: None,
        source: RoundSource::Manual,
        source_ref: None,
    })
}

async fn create_round(store: web::Data<dyn RoundStore>, new_round: NewRound) -> Result<Round, String> {
    let store = store.into_inner();
    tokio::task::spawn_blocking(move || store.insert_round(&new_round))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}
