pub mod import;
pub mod rounds;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::web;
use serde_json::json;

/// Registers every API scope on an application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(rounds::configure_routes())
        .service(import::configure_routes());
}

/// JSON body shared by every failed API call.
pub(crate) fn error_body(category: &str, message: &str) -> serde_json::Value {
    json!({
        "ok": false,
        "error": category,
        "message": message,
    })
}
