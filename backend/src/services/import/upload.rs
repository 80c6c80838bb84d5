use super::columns::resolve_columns;
use super::materialize::materialize;
use super::reconcile::reconcile;
use super::tokenizer::tokenize;
use crate::config::ImportLimits;
use crate::db::RoundStore;
use crate::error::ImportError;
use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::import::ImportResponse;
use futures_util::StreamExt;
use log::{error, info, warn};

/// Fields pulled out of the multipart body.
struct ImportForm {
    file_name: String,
    csv_text: String,
    user_id: String,
    player_name: Option<String>,
}

/// HTTP handler for `POST /api/import/udisc`.
///
/// - On success: `200 OK` with an `ImportResponse`.
/// - On failure: the `ImportError` body, `400` for bad input and `500` for
///   storage faults. A failed hole batch still returns the created round.
pub async fn process(
    req: HttpRequest,
    payload: web::Payload,
    store: web::Data<dyn RoundStore>,
    limits: web::Data<ImportLimits>,
) -> impl Responder {
    match import_udisc(&req, payload, store, limits.max_upload_bytes).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected UDisc import: {}", e);
            } else {
                error!("UDisc import failed: {}", e);
            }
            e.error_response()
        }
    }
}

/// Runs the whole import: read form, tokenize, resolve, reconcile, persist.
async fn import_udisc(
    req: &HttpRequest,
    payload: web::Payload,
    store: web::Data<dyn RoundStore>,
    max_upload_bytes: usize,
) -> Result<ImportResponse, ImportError> {
    let form = read_form(req, payload, max_upload_bytes).await?;

    let table = tokenize(&form.csv_text)?;
    let columns = resolve_columns(&table.headers);
    if columns.hole_columns.is_empty() {
        return Err(ImportError::MissingColumns {
            headers: table.headers.clone(),
        });
    }

    let reconciled = reconcile(&table, &columns, form.player_name.as_deref())?;
    let player_name = reconciled.player_name.clone();

    // The SQLite driver blocks, so both writes run off the async worker.
    let store = store.into_inner();
    let user_id = form.user_id;
    let file_name = form.file_name;
    let materialized = tokio::task::spawn_blocking(move || {
        materialize(store.as_ref(), &reconciled, &user_id, &file_name)
    })
    .await
    .map_err(|e| ImportError::Unexpected(format!("import task failed: {}", e)))??;

    info!(
        "Imported round {} for '{}' with {} hole results",
        materialized.round.id, player_name, materialized.holes_inserted
    );

    Ok(ImportResponse {
        ok: true,
        round: materialized.round,
        holes_inserted: materialized.holes_inserted,
        player_name,
        debug: columns.to_resolved_headers(),
    })
}

async fn read_form(
    req: &HttpRequest,
    payload: web::Payload,
    max_upload_bytes: usize,
) -> Result<ImportForm, ImportError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.contains("multipart/form-data") {
        return Err(ImportError::InvalidRequest(format!(
            "Content-Type must be multipart/form-data, got '{}'",
            content_type
        )));
    }

    let mut multipart = Multipart::new(req.headers(), payload);
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut user_id: Option<String> = None;
    let mut player_name: Option<String> = None;

    while let Some(item) = multipart.next().await {
        let mut field = item.map_err(|e| {
            ImportError::InvalidRequest(format!("Malformed multipart body: {}", e))
        })?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()));
                let bytes = read_field(&mut field, max_upload_bytes).await?;
                // A plain text part named "file" is not an upload.
                if let Some(filename) = filename {
                    file = Some((filename, bytes));
                }
            }
            Some("userId") => {
                user_id = non_empty(read_field(&mut field, max_upload_bytes).await?);
            }
            Some("playerName") => {
                player_name = non_empty(read_field(&mut field, max_upload_bytes).await?);
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| {
        ImportError::InvalidRequest("Missing CSV file or file is not a File".to_string())
    })?;
    let user_id =
        user_id.ok_or_else(|| ImportError::InvalidRequest("Missing userId field".to_string()))?;

    Ok(ImportForm {
        file_name,
        csv_text: String::from_utf8_lossy(&bytes).into_owned(),
        user_id,
        player_name,
    })
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ImportError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| ImportError::InvalidRequest(format!("Error reading upload: {}", e)))?;
        if bytes.len() + chunk.len() > limit {
            return Err(ImportError::InvalidRequest(format!(
                "Upload exceeds the {} byte limit",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn non_empty(bytes: Vec<u8>) -> Option<String> {
    let text = String::from_utf8_lossy(&bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
