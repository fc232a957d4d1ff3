//! Public registration routes driven through the router.

mod common;

use axum::http::{StatusCode, header};
use common::{app, form_post, get, send};
use registra_core::models::form::{FieldSchema, FieldType, FormSchema};
use registra_core::models::tenant::CreateTenant;
use registra_core::models::webinar::CreateWebinar;
use registra_core::repository::{Pagination, SubmissionRepository};
use registra_server::state::AppState;
use serde_json::json;
use uuid::Uuid;

/// Tenant `acme` with webinar `launch` and schema
/// `[email (required), phone (tel, optional)]`.
async fn seed(state: &AppState) -> Uuid {
    let catalog = state.catalog();
    let tenant = catalog
        .create_tenant(CreateTenant {
            name: "Acme".into(),
            slug: "acme".into(),
            logo: None,
            social_links: Vec::new(),
        })
        .await
        .unwrap();
    let webinar = catalog
        .create_webinar(
            tenant.id,
            CreateWebinar {
                tenant_id: tenant.id,
                title: "Launch".into(),
                slug: "launch".into(),
                subtitle: None,
                description: None,
                video_webinar_id: None,
                hero_image: None,
                header_logo: None,
                form_schema: FormSchema::new(vec![
                    FieldSchema::new(FieldType::Email, "email", "Email", true),
                    FieldSchema::new(FieldType::Tel, "phone", "Phone", false),
                ]),
                tracking_scripts: Vec::new(),
                meta_title: None,
                meta_description: None,
                enrichment_webhook_url: None,
            },
        )
        .await
        .unwrap();
    webinar.id
}

async fn stored_count(state: &AppState, webinar_id: Uuid) -> u64 {
    state
        .submissions
        .list_by_webinar(webinar_id, Pagination::default())
        .await
        .unwrap()
        .total
}

#[tokio::test]
async fn path_routed_registration_redirects_and_stores() {
    let (router, state) = app().await;
    let webinar_id = seed(&state).await;

    let response = send(
        &router,
        form_post("/client/acme/webinars/launch", "localhost", "email=a%40b.com"),
    )
    .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.header(header::LOCATION),
        Some("/client/acme/webinars/launch?registered=1")
    );

    let stored = state
        .submissions
        .list_all_by_webinar(webinar_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        serde_json::Value::Object(stored[0].data.clone()),
        json!({ "email": "a@b.com" })
    );
}

#[tokio::test]
async fn invalid_email_answers_422_and_stores_nothing() {
    let (router, state) = app().await;
    let webinar_id = seed(&state).await;

    let response = send(
        &router,
        form_post("/client/acme/webinars/launch", "localhost", "email=not-an-email"),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json();
    assert!(body["message"].is_string());
    assert!(body["errors"]["email"].is_array());
    assert_eq!(stored_count(&state, webinar_id).await, 0);
}

#[tokio::test]
async fn subdomain_registration_normalizes_phone_and_keeps_utm() {
    let (router, state) = app().await;
    let webinar_id = seed(&state).await;

    let response = send(
        &router,
        form_post(
            "/webinars/launch",
            "acme.example.com",
            "email=a%40b.com&phone=%2B1+%28555%29+123-4567&utm_source=paid&_token=x",
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.header(header::LOCATION),
        Some("/webinars/launch?registered=1")
    );

    let stored = state
        .submissions
        .list_all_by_webinar(webinar_id)
        .await
        .unwrap();
    assert_eq!(stored[0].data["phone"], json!("+15551234567"));
    assert!(stored[0].data.get("_token").is_none());
    assert_eq!(stored[0].utm.utm_source.as_deref(), Some("paid"));
}

#[tokio::test]
async fn forwarded_host_header_wins() {
    let (router, state) = app().await;
    seed(&state).await;

    let request = axum::http::Request::builder()
        .uri("/webinars/launch?original_host=other.example.com")
        .header(header::HOST, "www.example.com")
        .header("x-original-host", "acme.example.com")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status, StatusCode::OK);
    let page = response.json();
    assert_eq!(page["tenant"]["slug"], "acme");
    assert_eq!(page["webinar"]["title"], "Launch");
    assert_eq!(page["registered"], false);
    assert_eq!(page["fields"][0]["name"], "email");
    assert_eq!(page["fields"][0]["input_type"], "email");
    assert_eq!(page["fields"][1]["widget"], "input");
}

#[tokio::test]
async fn original_host_query_beats_literal_host() {
    let (router, state) = app().await;
    seed(&state).await;

    let response = send(
        &router,
        get(
            "/webinars/launch?original_host=acme.example.com&registered=1",
            "webinars.example.com",
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["registered"], true);
}

#[tokio::test]
async fn unresolved_host_is_404() {
    let (router, state) = app().await;
    seed(&state).await;

    let ignored = send(&router, get("/webinars/launch", "www.example.com")).await;
    assert_eq!(ignored.status, StatusCode::NOT_FOUND);

    let unknown = send(&router, get("/webinars/launch", "globex.example.com")).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_webinar_or_tenant_slug_is_404() {
    let (router, state) = app().await;
    seed(&state).await;

    let webinar = send(&router, get("/client/acme/webinars/nope", "localhost")).await;
    assert_eq!(webinar.status, StatusCode::NOT_FOUND);

    let tenant = send(&router, get("/client/globex/webinars/launch", "localhost")).await;
    assert_eq!(tenant.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn query_routed_registration_redirects_to_a_resolvable_page() {
    let (router, state) = app().await;
    seed(&state).await;

    let response = send(
        &router,
        form_post(
            "/webinars/launch?original_host=acme.example.com",
            "webinars.example.com",
            "email=a%40b.com",
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.header(header::LOCATION).unwrap().to_string();
    assert_eq!(
        location,
        "/webinars/launch?original_host=acme.example.com&registered=1"
    );

    let back = send(&router, get(&location, "webinars.example.com")).await;
    assert_eq!(back.status, StatusCode::OK);
    assert_eq!(back.json()["tenant"]["slug"], "acme");
    assert_eq!(back.json()["registered"], true);
}

#[tokio::test]
async fn utm_in_post_url_is_stored() {
    let (router, state) = app().await;
    let webinar_id = seed(&state).await;

    let response = send(
        &router,
        form_post(
            "/client/acme/webinars/launch?utm_source=paid&utm_campaign=spring",
            "localhost",
            "email=a%40b.com&utm_campaign=launch",
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let stored = state
        .submissions
        .list_all_by_webinar(webinar_id)
        .await
        .unwrap();
    assert_eq!(stored[0].utm.utm_source.as_deref(), Some("paid"));
    assert_eq!(stored[0].utm.utm_campaign.as_deref(), Some("launch"));
}
