//! Tenant and webinar administration rules.

mod common;

use common::{email_phone_schema, new_tenant, new_webinar, repos, setup};
use registra_core::RegistraError;
use registra_core::models::form::{FieldSchema, FieldType, FormSchema};
use registra_core::models::webinar::UpdateWebinar;
use registra_intake::Catalog;
use uuid::Uuid;

#[tokio::test]
async fn tenant_slug_must_be_a_host_label() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);

    let err = catalog
        .create_tenant(new_tenant("Acme", "Acme Corp"))
        .await
        .unwrap_err();
    match err {
        RegistraError::Validation(errors) => assert!(errors.contains("slug")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn webinar_needs_existing_tenant() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);

    let err = catalog
        .create_webinar(Uuid::new_v4(), new_webinar("launch", email_phone_schema()))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistraError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_field_names_are_rejected_on_save() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);
    let tenant = catalog.create_tenant(new_tenant("Acme", "acme")).await.unwrap();

    let schema = FormSchema::new(vec![
        FieldSchema::new(FieldType::Email, "email", "Email", true),
        FieldSchema::new(FieldType::Text, "email", "Work email", false),
    ]);
    let err = catalog
        .create_webinar(tenant.id, new_webinar("launch", schema))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistraError::InvalidSchema { .. }));

    let listed = catalog
        .list_webinars(tenant.id, Default::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn linking_on_create_augments_schema() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);
    let tenant = catalog.create_tenant(new_tenant("Acme", "acme")).await.unwrap();

    let mut input = new_webinar(
        "launch",
        FormSchema::new(vec![FieldSchema::new(FieldType::Text, "nombre", "Nombre", true)]),
    );
    input.video_webinar_id = Some("8123".into());
    let webinar = catalog.create_webinar(tenant.id, input).await.unwrap();

    let names: Vec<_> = webinar.form_schema.names().collect();
    assert_eq!(names, vec!["nombre", "email", "last_name"]);
    assert!(webinar.form_schema.iter().all(|f| f.required));
}

#[tokio::test]
async fn linking_on_update_augments_once() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);
    let tenant = catalog.create_tenant(new_tenant("Acme", "acme")).await.unwrap();
    let webinar = catalog
        .create_webinar(tenant.id, new_webinar("launch", email_phone_schema()))
        .await
        .unwrap();
    assert_eq!(webinar.form_schema.len(), 2);

    let link = || UpdateWebinar {
        video_webinar_id: Some("8123".into()),
        ..Default::default()
    };
    let linked = catalog.update_webinar(webinar.id, link()).await.unwrap();
    let names: Vec<_> = linked.form_schema.names().collect();
    assert_eq!(names, vec!["email", "phone", "first_name", "last_name"]);

    let again = catalog.update_webinar(webinar.id, link()).await.unwrap();
    assert_eq!(again.form_schema, linked.form_schema);
}

#[tokio::test]
async fn unrelated_update_leaves_schema_alone() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);
    let tenant = catalog.create_tenant(new_tenant("Acme", "acme")).await.unwrap();
    let webinar = catalog
        .create_webinar(tenant.id, new_webinar("launch", email_phone_schema()))
        .await
        .unwrap();

    let updated = catalog
        .update_webinar(
            webinar.id,
            UpdateWebinar {
                title: Some("Launch day".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Launch day");
    assert_eq!(updated.form_schema, webinar.form_schema);
}

#[tokio::test]
async fn deleting_unknown_webinar_is_not_found() {
    let db = setup().await;
    let (tenants, webinars, _) = repos(&db);
    let catalog = Catalog::new(tenants, webinars);

    let err = catalog.delete_webinar(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RegistraError::NotFound { .. }));
}
