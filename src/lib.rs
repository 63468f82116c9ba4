//! Clients administration: a REST backend (`server` feature) and the console
//! core that drives it (`console` feature), sharing one data layer.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, http::header, middleware, web};

pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod schema;
pub mod sheet;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod events;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
use crate::{events::ClientEvents, models::config::ServerConfig, repository::DieselRepository};

/// CORS policy admitting the configured front-end origin.
#[cfg(feature = "server")]
pub fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;
    db::run_migrations(&pool)
        .map_err(|e| std::io::Error::other(format!("Failed to migrate database: {e}")))?;

    let repo = DieselRepository::new(pool);
    let events = ClientEvents::new(server_config.event_buffer);

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving clients API on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&server_config.allowed_origin))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(events.clone()))
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
