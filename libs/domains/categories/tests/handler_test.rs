//! Handler tests for the categories domain against PostgreSQL.

use axum::Router;
use axum::http::StatusCode;
use domain_categories::*;
use serde_json::{Value, json};
use test_utils::{TestAuth, TestDataBuilder, TestDatabase, fixtures, json_body, request};
use tower::ServiceExt;
use uuid::Uuid;

fn app(db: &TestDatabase, auth: &TestAuth) -> Router {
    let service = CategoryService::new(PgCategoryRepository::new(db.connection()));
    auth.layer(handlers::router(service))
}

#[tokio::test]
async fn test_create_requires_admin() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let app = app(&db, &auth);
    let body = json!({ "name": "Books" });

    let response = app
        .clone()
        .oneshot(request("POST", "/", None, Some(body.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let customer = auth.customer(Uuid::new_v4());
    let response = app
        .oneshot(request("POST", "/", Some(&customer), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_derives_slug_and_rejects_duplicate() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let app = app(&db, &auth);
    let admin = auth.admin(Uuid::new_v4());
    let builder = TestDataBuilder::from_test_name("category_slug");
    let name = format!("Home & Garden {}", builder.name("cat", "x"));

    let response = app
        .clone()
        .oneshot(request("POST", "/", Some(&admin), Some(json!({ "name": name }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Category = json_body(response).await;
    assert_eq!(created.slug, slugify(&name));
    assert!(created.slug.starts_with("home-garden-"));

    let response = app
        .oneshot(request("POST", "/", Some(&admin), Some(json!({ "name": name }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_with_unknown_parent_is_404() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let admin = auth.admin(Uuid::new_v4());

    let response = app(&db, &auth)
        .oneshot(request(
            "POST",
            "/",
            Some(&admin),
            Some(json!({ "name": "Orphan", "parent_id": Uuid::new_v4() })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response).await;
    assert_eq!(body["message"], "Parent category not found");
}

#[tokio::test]
async fn test_get_includes_tree_and_active_products() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let builder = TestDataBuilder::from_test_name("category_detail");
    let parent = fixtures::category(&db.connection, &builder, "parent").await;
    let admin = auth.admin(Uuid::new_v4());
    let app = app(&db, &auth);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(&admin),
            Some(json!({ "name": builder.name("child", "x"), "parent_id": parent.id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let child: Category = json_body(response).await;

    fixtures::product(&db.connection, &builder, parent.id, "p1", "10.00", 5).await;

    let response = app
        .clone()
        .oneshot(request("GET", &format!("/{}", parent.id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail: CategoryDetail = json_body(response).await;
    assert!(detail.parent.is_none());
    assert_eq!(detail.children.len(), 1);
    assert_eq!(detail.children[0].id, child.id);
    assert_eq!(detail.products.len(), 1);

    let response = app
        .oneshot(request("GET", &format!("/{}", child.id), None, None))
        .await
        .unwrap();
    let detail: CategoryDetail = json_body(response).await;
    assert_eq!(detail.parent.map(|p| p.id), Some(parent.id));
}

#[tokio::test]
async fn test_update_self_parent_is_400() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let builder = TestDataBuilder::from_test_name("category_self_parent");
    let category = fixtures::category(&db.connection, &builder, "self").await;
    let admin = auth.admin(Uuid::new_v4());

    let response = app(&db, &auth)
        .oneshot(request(
            "PATCH",
            &format!("/{}", category.id),
            Some(&admin),
            Some(json!({ "parent_id": category.id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let builder = TestDataBuilder::from_test_name("category_delete");
    let category = fixtures::category(&db.connection, &builder, "gone").await;
    let admin = auth.admin(Uuid::new_v4());
    let app = app(&db, &auth);
    let uri = format!("/{}", category.id);

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("DELETE", &uri, Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_products_is_conflict() {
    let db = TestDatabase::new().await;
    let auth = TestAuth::new();
    let builder = TestDataBuilder::from_test_name("category_in_use");
    let category = fixtures::category(&db.connection, &builder, "used").await;
    fixtures::product(&db.connection, &builder, category.id, "p", "5.00", 1).await;
    let admin = auth.admin(Uuid::new_v4());

    let response = app(&db, &auth)
        .oneshot(request(
            "DELETE",
            &format!("/{}", category.id),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
