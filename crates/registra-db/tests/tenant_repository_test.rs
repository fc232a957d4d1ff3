//! Integration tests for the Tenant repository using in-memory SurrealDB.

use registra_core::RegistraError;
use registra_core::models::tenant::{CreateTenant, SocialLink, UpdateTenant};
use registra_core::repository::{Pagination, TenantRepository};
use registra_db::repository::SurrealTenantRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    registra_db::run_migrations(&db).await.unwrap();
    db
}

fn tenant(name: &str, slug: &str) -> CreateTenant {
    CreateTenant {
        name: name.into(),
        slug: slug.into(),
        logo: None,
        social_links: Vec::new(),
    }
}

#[tokio::test]
async fn create_and_get_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let created = repo
        .create(CreateTenant {
            name: "Acme".into(),
            slug: "acme".into(),
            logo: Some("https://cdn.example.com/acme.png".into()),
            social_links: vec![SocialLink {
                kind: "linkedin".into(),
                url: "https://linkedin.com/company/acme".into(),
            }],
        })
        .await
        .unwrap();

    assert_eq!(created.slug, "acme");
    assert_eq!(created.social_links.len(), 1);

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.name, "Acme");
    assert_eq!(fetched.logo.as_deref(), Some("https://cdn.example.com/acme.png"));
    assert_eq!(fetched.social_links, created.social_links);

    let by_slug = repo.get_by_slug("acme").await.unwrap();
    assert_eq!(by_slug.id, created.id);
}

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(tenant("Acme", "acme")).await.unwrap();
    let err = repo.create(tenant("Other Acme", "acme")).await.unwrap_err();
    assert!(matches!(err, RegistraError::AlreadyExists { .. }));
}

#[tokio::test]
async fn missing_slug_is_not_found() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let err = repo.get_by_slug("ghost").await.unwrap_err();
    assert!(matches!(err, RegistraError::NotFound { .. }));
}

#[tokio::test]
async fn update_tenant_fields() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let created = repo.create(tenant("Before", "before")).await.unwrap();
    let updated = repo
        .update(
            created.id,
            UpdateTenant {
                name: Some("After".into()),
                slug: Some("after".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "After");
    assert_eq!(updated.slug, "after");
    assert!(repo.get_by_slug("before").await.is_err());
}

#[tokio::test]
async fn update_to_taken_slug_conflicts() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(tenant("One", "one")).await.unwrap();
    let two = repo.create(tenant("Two", "two")).await.unwrap();

    let err = repo
        .update(
            two.id,
            UpdateTenant {
                slug: Some("one".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistraError::AlreadyExists { .. }));
}

#[tokio::test]
async fn delete_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let created = repo.create(tenant("Gone", "gone")).await.unwrap();
    repo.delete(created.id).await.unwrap();

    let err = repo.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, RegistraError::NotFound { .. }));
}

#[tokio::test]
async fn list_tenants_paginates() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    for i in 0..3 {
        repo.create(tenant(&format!("T{i}"), &format!("t{i}")))
            .await
            .unwrap();
    }

    let page = repo
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = repo
        .list(Pagination {
            offset: 2,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
}
