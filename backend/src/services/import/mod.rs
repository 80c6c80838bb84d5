//! Imports rounds from third-party scorecard exports.
//!
//! The UDisc import runs in four stages, each feeding the next:
//! - `tokenizer`: raw CSV text into a header row and keyed data rows.
//! - `columns`: header text into the logical fields a round needs.
//! - `reconcile`: par row and player row into a round plus hole results.
//! - `materialize`: the round, then the hole batch, into the store.
//!
//! Route:
//! - `POST /api/import/udisc`: multipart upload with `file` (the CSV),
//!   `userId` and an optional `playerName`.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod columns;
mod materialize;
mod reconcile;
mod tokenizer;
mod upload;


const API_PATH: &str = "/api/import";

/// Configures and returns the Actix scope for import routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/udisc", post().to(upload::process))
}
