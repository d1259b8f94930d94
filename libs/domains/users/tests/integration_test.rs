//! Integration tests for the users domain against PostgreSQL (testcontainers).

use domain_users::*;
use entity::Role;
use test_utils::{TestAuth, TestDataBuilder, TestDatabase, assertions::*, fixtures};

fn new_user(email: String, role: Role) -> NewUser {
    NewUser {
        email,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        phone: None,
        role,
    }
}

#[tokio::test]
async fn test_create_and_find_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("users_create_find");

    let created = repo
        .create(new_user(builder.email("jane"), Role::Customer))
        .await
        .unwrap();

    let by_id = assert_some(repo.find_by_id(created.id).await.unwrap(), "user by id");
    assert_uuid_eq(by_id.id, created.id, "user id");
    assert_eq!(by_id.role, Role::Customer);

    let by_email = repo
        .find_by_email(&builder.email("jane").to_uppercase())
        .await
        .unwrap();
    assert_some(by_email, "lookup by email ignores case");
}

#[tokio::test]
async fn test_duplicate_email_maps_to_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("users_duplicate");

    repo.create(new_user(builder.email("dup"), Role::Customer))
        .await
        .unwrap();
    let err = repo
        .create(new_user(builder.email("dup"), Role::Customer))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("users_delete");
    let user = fixtures::user(&db.connection, &builder, "gone").await;

    let service = UserService::new(PgUserRepository::new(db.connection()), TestAuth::new().jwt);
    service.delete_user(user.id).await.unwrap();

    let err = service.delete_user(user.id).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));
}

#[tokio::test]
async fn test_refresh_hash_is_persisted_and_cleared() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("users_refresh");
    let repo = PgUserRepository::new(db.connection());
    let service = UserService::new(PgUserRepository::new(db.connection()), TestAuth::new().jwt);

    let registered = service
        .register(RegisterRequest {
            email: builder.email("refresh"),
            password: "Str0ng@Pass".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    let stored = assert_some(
        repo.find_by_id(registered.user.id).await.unwrap(),
        "registered user",
    );
    assert!(stored.refresh_token_hash.is_some());

    let rotated = service
        .refresh(&registered.tokens.refresh_token)
        .await
        .unwrap();
    assert_ne!(rotated.tokens.refresh_token, registered.tokens.refresh_token);

    service.logout(registered.user.id).await.unwrap();
    let stored = assert_some(
        repo.find_by_id(registered.user.id).await.unwrap(),
        "user after logout",
    );
    assert!(stored.refresh_token_hash.is_none());
}

#[tokio::test]
async fn test_list_filters_by_role_and_paginates() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("users_list");
    fixtures::user(&db.connection, &builder, "c1").await;
    fixtures::user(&db.connection, &builder, "c2").await;
    fixtures::user_with_role(&db.connection, &builder, "a1", Role::Admin).await;

    let repo = PgUserRepository::new(db.connection());
    let admins = repo
        .list(UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(admins.len(), 1);

    let page = repo
        .list(UserFilter {
            role: Some(Role::Customer),
            limit: 1,
            offset: 1,
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
}
