use crate::db::RoundStore;
use crate::services::error_body;
use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde_json::json;

/// Actix handler for `GET /api/rounds/{round_id}/holes`.
///
/// An unknown round yields an empty list rather than `404`.
pub async fn process(round_id: web::Path<String>, store: web::Data<dyn RoundStore>) -> impl Responder {
    let round_id = round_id.into_inner();
    let store = store.into_inner();
    let result = tokio::task::spawn_blocking(move || store.list_hole_results(&round_id)).await;

    match result {
        Ok(Ok(holes)) => HttpResponse::Ok().json(json!({ "holes": holes })),
        Ok(Err(e)) => {
            error!("Error fetching hole results: {}", e);
            HttpResponse::InternalServerError()
                .json(error_body("persistence", "Error fetching hole results"))
        }
        Err(e) => {
            error!("Hole results task failed: {}", e);
            HttpResponse::InternalServerError().json(error_body("unexpected", "Unexpected server error"))
        }
    }
}
