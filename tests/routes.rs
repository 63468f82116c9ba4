#![cfg(feature = "server")]

use std::future::poll_fn;

use actix_web::body::MessageBody;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::json;

use crud_clients::domain::client_event::ClientChange;
use crud_clients::domain::types::ClientId;
use crud_clients::dto::api::{ClientsResponse, ErrorBody};
use crud_clients::events::{ClientChangePublisher, ClientEvents, INIT_FRAME};
use crud_clients::repository::DieselRepository;
use crud_clients::routes;

mod common;

macro_rules! app {
    ($db:expr, $events:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(DieselRepository::new($db.pool())))
                .app_data(web::Data::new($events.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

fn jane() -> serde_json::Value {
    json!({
        "fullName": "Jane Doe",
        "displayName": "Jane",
        "email": "jane@example.com",
        "details": "VIP",
        "active": true,
        "location": "Amsterdam",
        "country": "Netherlands"
    })
}

#[actix_web::test]
async fn test_create_update_delete_round_trip() {
    let db = common::TestDb::new("routes_round_trip.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .set_json(jane())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: ClientsResponse = test::read_body_json(resp).await;
    assert_eq!(body.clients.len(), 1);
    let id = body.clients[0].id;

    let req = test::TestRequest::put()
        .uri("/api/v1/clients")
        .set_json(json!({ "id": id, "displayName": "Janie", "active": false }))
        .to_request();
    let body: ClientsResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.clients[0].display_name, "Janie");
    assert!(!body.clients[0].active);
    assert_eq!(body.clients[0].email, "jane@example.com");

    let req = test::TestRequest::delete()
        .uri("/api/v1/clients")
        .set_json(json!({ "ids": [id, null, 999] }))
        .to_request();
    let body: ClientsResponse = test::call_and_read_body_json(&app, req).await;
    assert!(body.clients.is_empty());
}

#[actix_web::test]
async fn test_bulk_create_and_list_sorted() {
    let db = common::TestDb::new("routes_bulk.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients/bulk")
        .set_json(json!({ "clients": [
            jane(),
            { "fullName": "Bob Ray", "displayName": "Bob", "email": "bob@example.com", "country": "France" }
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/v1/clients").to_request();
    let body: ClientsResponse = test::call_and_read_body_json(&app, req).await;
    let ids = body.clients.iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);
    assert_eq!(body.clients[1].location, None);
}

#[actix_web::test]
async fn test_empty_bulk_is_bad_request() {
    let db = common::TestDb::new("routes_empty_bulk.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients/bulk")
        .set_json(json!({ "clients": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_duplicate_email_is_conflict() {
    let db = common::TestDb::new("routes_duplicate.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/api/v1/clients")
            .set_json(jane())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
        if expected == StatusCode::CONFLICT {
            let body: ErrorBody = test::read_body_json(resp).await;
            assert_eq!(body.error, "Conflict");
            assert!(body.message.contains("jane@example.com"));
        }
    }
}

#[actix_web::test]
async fn test_update_unknown_client_is_not_found() {
    let db = common::TestDb::new("routes_not_found.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let req = test::TestRequest::put()
        .uri("/api/v1/clients")
        .set_json(json!({ "id": 77, "active": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invalid_body_uses_error_shape() {
    let db = common::TestDb::new("routes_invalid.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .set_json(json!({ "fullName": "No Email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.error, "Bad Request");
}

#[actix_web::test]
async fn test_upload_imports_sheet() {
    let db = common::TestDb::new("routes_upload.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let sheet = "Full Name,Display Name,Email,Active,Country\n\
                 Jane Doe,Jane,jane@example.com,yes,Netherlands\n\
                 ,Nobody,nobody@example.com,no,Chile\n";
    let payload = format!(
        "--BOUNDARY\r\n\
         Content-Disposition: form-data; name=\"csv\"; filename=\"clients.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {sheet}\r\n\
         --BOUNDARY--\r\n"
    );
    let req = test::TestRequest::post()
        .uri("/api/v1/clients/upload")
        .insert_header((header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY"))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: ClientsResponse = test::read_body_json(resp).await;
    assert_eq!(body.clients.len(), 1);
    assert!(body.clients[0].active);
}

#[actix_web::test]
async fn test_event_stream_starts_with_init() {
    let db = common::TestDb::new("routes_events.db");
    let events = ClientEvents::new(16);
    let app = app!(db, events);

    let req = test::TestRequest::get()
        .uri("/api/v1/clients/events")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    let mut body = Box::pin(resp.into_body());
    let first = poll_fn(|cx| body.as_mut().poll_next(cx))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first, INIT_FRAME.as_bytes());

    events.publish(ClientChange::deleted(ClientId::new(3).unwrap()));
    let next = poll_fn(|cx| body.as_mut().poll_next(cx))
        .await
        .unwrap()
        .unwrap();
    let text = String::from_utf8(next.to_vec()).unwrap();
    assert!(text.starts_with("event: DELETED\ndata: {"));
    assert!(text.contains("\"clientId\":3"));
}

#[actix_web::test]
async fn test_cors_allows_configured_origin() {
    let db = common::TestDb::new("routes_cors.db");
    let app = test::init_service(
        App::new()
            .wrap(crud_clients::cors("http://localhost:4200"))
            .app_data(web::Data::new(DieselRepository::new(db.pool())))
            .app_data(web::Data::new(ClientEvents::new(4)))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/clients")
        .insert_header((header::ORIGIN, "http://localhost:4200"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:4200"
    );
}
