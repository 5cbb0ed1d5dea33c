mod config;
mod error;
mod services;
mod storage;
mod token_controller;

use crate::config::Config;
use crate::error::ServiceError;
use crate::storage::{users, Storage};
use crate::token_controller::blacklist::{start_blacklist_sweeper, TokenBlacklist};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let storage = Storage::new(&config.database_path);
    storage.initialize().map_err(io::Error::other)?;
    if let Some(email) = &config.bootstrap_user {
        let conn = storage.connect().map_err(io::Error::other)?;
        let user = users::ensure(&conn, email).map_err(io::Error::other)?;
        info!("Bootstrap editor {} (id {}) ready", user.email, user.id);
    }
    info!("Using database {}", config.database_path.display());

    // Start blacklist sweeper task
    let blacklist = TokenBlacklist::new();
    let sweeper = blacklist.clone();
    let sweep_interval = config.blacklist_sweep_interval;
    tokio::spawn(async move {
        start_blacklist_sweeper(sweeper, sweep_interval).await;
    });

    let (host, port) = (config.host.clone(), config.port);
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(
                web::JsonConfig::default()
                    .limit(config.json_limit)
                    .error_handler(|err, _req| {
                        ServiceError::invalid(format!("malformed request body: {}", err)).into()
                    }),
            )
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(blacklist.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(services::configure)
    })
        .bind((host.as_str(), port))?
        .run()
        .await
}
