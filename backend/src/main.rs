mod config;
mod db;
mod error;
mod services;

use crate::config::Config;
use crate::db::{RoundStore, SqliteStore};
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::sync::Arc;

/// Largest JSON body accepted by the manual round endpoints.
const JSON_LIMIT_BYTES: usize = 64 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::parse();
    env_logger::init_from_env(Env::default().default_filter_or(config.log_level.as_str()));

    let store = SqliteStore::open(&config.database).map_err(std::io::Error::other)?;
    info!("Using database at {}", config.database.display());

    let store: Arc<dyn RoundStore> = Arc::new(store);
    let store = web::Data::from(store);
    let limits = web::Data::new(config.import_limits());

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().limit(JSON_LIMIT_BYTES))
            .app_data(store.clone())
            .app_data(limits.clone())
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
