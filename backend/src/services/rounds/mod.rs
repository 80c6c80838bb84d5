//! # Rounds Service Module
//!
//! Routes under `/api/rounds` for reading and hand-entering rounds. Imported
//! rounds are written by `services::import`; this module only reads them back.
//!
//! ## Sub-modules:
//! - `list`: a user's rounds, newest first.
//! - `create`: manual round entry.
//! - `holes`: the hole results stored for one round.

mod create;
mod holes;
mod list;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all round endpoints.
const API_PATH: &str = "/api/rounds";

/// Configures and returns the Actix `Scope` for round routes.
///
/// # Registered Routes:
///
/// *   **`GET ?userId=...`**:
///     - **Handler**: `list::process`
///     - **Description**: Returns `{ "rounds": [...] }` for the user, ordered by
///       start time then creation time, newest first.
///
/// *   **`POST`**:
///     - **Handler**: `create::process`
///     - **Description**: Creates a manual round from `{ userId, courseName, layoutName? }`
///       starting now, and answers `201` with `{ "round": ... }`.
///
/// *   **`GET /{round_id}/holes`**:
///     - **Handler**: `holes::process`
///     - **Description**: Returns `{ "holes": [...] }` in play order.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{round_id}/holes", get().to(holes::process))
}
