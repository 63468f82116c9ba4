//! HTTP layer: handlers, JSON error bodies and route registration.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, error, web};

use crate::domain::client::Client;
use crate::dto::api::{ClientsResponse, ErrorBody};
use crate::services::{ServiceError, ServiceResult};

pub mod api;

/// Registers every `/api/v1/clients` handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api/v1/clients")
            .service(api::client_events)
            .service(api::list_clients)
            .service(api::create_client)
            .service(api::bulk_create_clients)
            .service(api::upload_clients)
            .service(api::update_client)
            .service(api::delete_clients),
    );
}

/// Reports malformed JSON bodies with the same error shape as services.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = error_response(&ServiceError::Validation(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: &ServiceError) -> HttpResponse {
    let status = status_for(err);
    let message = match err {
        ServiceError::Internal(_) => "Unexpected error".to_string(),
        other => other.to_string(),
    };
    HttpResponse::build(status).json(ErrorBody::new(
        status.canonical_reason().unwrap_or("Error"),
        message,
    ))
}

/// Renders a service result as the clients snapshot or an error body.
pub fn snapshot_response(result: ServiceResult<Vec<Client>>, status: StatusCode) -> HttpResponse {
    match result {
        Ok(clients) => HttpResponse::build(status).json(ClientsResponse::from_clients(&clients)),
        Err(err) => error_response(&err),
    }
}
