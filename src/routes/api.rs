use actix_multipart::form::MultipartForm;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};
use log::error;

use crate::events::ClientEvents;
use crate::forms::client::{BulkCreateForm, CreateClientForm, DeleteClientsForm, UpdateClientForm};
use crate::forms::upload::UploadClientsForm;
use crate::repository::DieselRepository;
use crate::routes::{error_response, snapshot_response};
use crate::services::{ServiceError, clients};

#[get("")]
pub async fn list_clients(repo: web::Data<DieselRepository>) -> impl Responder {
    snapshot_response(clients::list_clients(repo.get_ref()), StatusCode::OK)
}

#[post("")]
pub async fn create_client(
    repo: web::Data<DieselRepository>,
    events: web::Data<ClientEvents>,
    web::Json(form): web::Json<CreateClientForm>,
) -> impl Responder {
    snapshot_response(
        clients::create_client(repo.get_ref(), events.get_ref(), form),
        StatusCode::CREATED,
    )
}

#[post("/bulk")]
pub async fn bulk_create_clients(
    repo: web::Data<DieselRepository>,
    events: web::Data<ClientEvents>,
    web::Json(form): web::Json<BulkCreateForm>,
) -> impl Responder {
    snapshot_response(
        clients::bulk_create_clients(repo.get_ref(), events.get_ref(), form),
        StatusCode::CREATED,
    )
}

#[post("/upload")]
pub async fn upload_clients(
    repo: web::Data<DieselRepository>,
    events: web::Data<ClientEvents>,
    MultipartForm(form): MultipartForm<UploadClientsForm>,
) -> impl Responder {
    let sheet = match form.open() {
        Ok(sheet) => sheet,
        Err(err) => {
            error!("Failed to open uploaded sheet: {err}");
            return error_response(&ServiceError::Internal(err.to_string()));
        }
    };

    snapshot_response(
        clients::upload_clients(repo.get_ref(), events.get_ref(), sheet),
        StatusCode::CREATED,
    )
}

#[put("")]
pub async fn update_client(
    repo: web::Data<DieselRepository>,
    events: web::Data<ClientEvents>,
    web::Json(form): web::Json<UpdateClientForm>,
) -> impl Responder {
    snapshot_response(
        clients::update_client(repo.get_ref(), events.get_ref(), form),
        StatusCode::OK,
    )
}

#[delete("")]
pub async fn delete_clients(
    repo: web::Data<DieselRepository>,
    events: web::Data<ClientEvents>,
    web::Json(form): web::Json<DeleteClientsForm>,
) -> impl Responder {
    snapshot_response(
        clients::delete_clients(repo.get_ref(), events.get_ref(), form),
        StatusCode::OK,
    )
}

#[get("/events")]
pub async fn client_events(events: web::Data<ClientEvents>) -> impl Responder {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .content_type("text/event-stream")
        .streaming(events.stream())
}
