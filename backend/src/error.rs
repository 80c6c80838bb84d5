//! Error types for the import pipeline and the round store.
//!
//! `ImportError` is the single taxonomy an import request can fail with. It
//! renders itself as a JSON body through actix-web's `ResponseError`, so the
//! HTTP status and the machine-readable `error` category always agree.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::round::Round;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database connection lock was poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum ImportError {
    /// Request never reached the pipeline: wrong content type, missing fields.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("CSV parse error: {0}")]
    MalformedInput(String),

    #[error("No hole columns found in CSV")]
    MissingColumns { headers: Vec<String> },

    #[error("{}", describe_missing_row(.player))]
    RowNotFound {
        player: Option<String>,
        player_header: String,
        headers: Vec<String>,
    },

    /// Nothing was written.
    #[error("Error creating round from UDisc CSV: {0}")]
    RoundPersistence(#[source] StoreError),

    /// The round row exists; only the hole results are missing.
    #[error("Round created, but error inserting hole results: {source}")]
    HolePersistence {
        round: Box<Round>,
        attempted: usize,
        #[source]
        source: StoreError,
    },

    #[error("Unexpected server error while importing UDisc CSV: {0}")]
    Unexpected(String),
}

fn describe_missing_row(player: &Option<String>) -> String {
    match player {
        Some(name) => format!("No row found for player \"{}\"", name),
        None => "No player row found in CSV".to_string(),
    }
}

impl ImportError {
    /// Stable, machine-distinguishable name of the failure.
    pub fn category(&self) -> &'static str {
        match self {
            ImportError::InvalidRequest(_) => "invalid_request",
            ImportError::MalformedInput(_) => "malformed_input",
            ImportError::MissingColumns { .. } => "missing_columns",
            ImportError::RowNotFound { .. } => "row_not_found",
            ImportError::RoundPersistence(_) => "persistence_round",
            ImportError::HolePersistence { .. } => "persistence_holes",
            ImportError::Unexpected(_) => "unexpected",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ImportError::MissingColumns { headers } => Some(json!({ "headers": headers })),
            ImportError::RowNotFound {
                player_header,
                headers,
                ..
            } => Some(json!({ "playerHeader": player_header, "headers": headers })),
            ImportError::RoundPersistence(source) | ImportError::HolePersistence { source, .. } => {
                Some(json!({ "cause": source.to_string() }))
            }
            _ => None,
        }
    }
}

impl ResponseError for ImportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ImportError::InvalidRequest(_)
            | ImportError::MalformedInput(_)
            | ImportError::MissingColumns { .. }
            | ImportError::RowNotFound { .. } => StatusCode::BAD_REQUEST,
            ImportError::RoundPersistence(_)
            | ImportError::HolePersistence { .. }
            | ImportError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = crate::services::error_body(self.category(), &self.to_string());
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        if let ImportError::HolePersistence {
            round, attempted, ..
        } = self
        {
            body["roundCreated"] = json!(true);
            body["round"] = json!(round);
            body["attemptedHoles"] = json!(attempted);
            body["holesInserted"] = json!(0);
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
