//! Default-address handling against PostgreSQL.

use domain_addresses::*;
use entity::addresses;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, SqlErr};
use test_utils::{TestDataBuilder, TestDatabase, fixtures};
use uuid::Uuid;

fn input(label: &str, is_default: Option<bool>) -> CreateAddress {
    CreateAddress {
        label: Some(label.to_string()),
        full_name: "Jane Doe".to_string(),
        phone: "+1 555 0100".to_string(),
        street: "1 Main St".to_string(),
        apartment: Some("Apt 4".to_string()),
        city: "Springfield".to_string(),
        state: Some("IL".to_string()),
        postal_code: "62701".to_string(),
        country: "us".to_string(),
        is_default,
    }
}

async fn default_ids(service: &AddressService<PgAddressRepository>, user_id: Uuid) -> Vec<Uuid> {
    service
        .list_addresses(user_id)
        .await
        .unwrap()
        .into_iter()
        .filter(|a| a.is_default)
        .map(|a| a.id)
        .collect()
}

#[tokio::test]
async fn test_at_most_one_default() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("addresses_default");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let other = fixtures::user(&db.connection, &builder, "other").await;
    let service = AddressService::new(PgAddressRepository::new(db.connection()));

    let home = service.create_address(user.id, input("Home", None)).await.unwrap();
    assert!(home.is_default);
    assert_eq!(home.country, "US");
    let theirs = service.create_address(other.id, input("Home", None)).await.unwrap();

    let work = service
        .create_address(user.id, input("Work", Some(true)))
        .await
        .unwrap();
    assert_eq!(default_ids(&service, user.id).await, vec![work.id]);

    let cabin = service.create_address(user.id, input("Cabin", None)).await.unwrap();
    assert!(!cabin.is_default);

    service.set_default(user.id, home.id).await.unwrap();
    assert_eq!(default_ids(&service, user.id).await, vec![home.id]);

    service
        .update_address(
            user.id,
            cabin.id,
            UpdateAddress {
                is_default: Some(true),
                city: Some("Lakeside".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(default_ids(&service, user.id).await, vec![cabin.id]);

    let listed = service.list_addresses(user.id).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].id, cabin.id);
    assert_eq!(listed[0].city, "Lakeside");
    assert_eq!(listed[1].id, work.id);

    assert_eq!(default_ids(&service, other.id).await, vec![theirs.id]);
}

#[tokio::test]
async fn test_concurrent_creates_keep_one_default() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("addresses_concurrent");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    let service = AddressService::new(PgAddressRepository::new(db.connection()));

    let (home, work) = tokio::join!(
        service.create_address(user.id, input("Home", None)),
        service.create_address(user.id, input("Work", None)),
    );
    let (home, work) = (home.unwrap(), work.unwrap());
    assert!(home.is_default ^ work.is_default);

    let (cabin, lake) = tokio::join!(
        service.create_address(user.id, input("Cabin", Some(true))),
        service.create_address(user.id, input("Lake", Some(true))),
    );
    let (cabin, lake) = (cabin.unwrap(), lake.unwrap());

    let defaults = default_ids(&service, user.id).await;
    assert_eq!(defaults.len(), 1);
    assert!(defaults[0] == cabin.id || defaults[0] == lake.id);
}

#[tokio::test]
async fn test_second_default_rejected_by_schema() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("addresses_unique_default");
    let user = fixtures::user(&db.connection, &builder, "buyer").await;
    fixtures::address(&db.connection, user.id, true).await;
    fixtures::address(&db.connection, user.id, false).await;

    let err = addresses::Entity::update_many()
        .col_expr(addresses::Column::IsDefault, Expr::value(true))
        .filter(addresses::Column::UserId.eq(user.id))
        .exec(&db.connection)
        .await
        .unwrap_err();
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn test_owner_only_access() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("addresses_owner");
    let owner = fixtures::user(&db.connection, &builder, "owner").await;
    let stranger = fixtures::user(&db.connection, &builder, "stranger").await;
    let service = AddressService::new(PgAddressRepository::new(db.connection()));

    let address = service.create_address(owner.id, input("Home", None)).await.unwrap();

    let err = service.get_address(stranger.id, address.id).await.unwrap_err();
    assert!(matches!(err, AddressError::NotFound(_)));
    let err = service
        .update_address(stranger.id, address.id, UpdateAddress::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AddressError::NotFound(_)));
    let err = service.delete_address(stranger.id, address.id).await.unwrap_err();
    assert!(matches!(err, AddressError::NotFound(_)));

    assert_eq!(service.get_address(owner.id, address.id).await.unwrap(), address);
    service.delete_address(owner.id, address.id).await.unwrap();
    let err = service.delete_address(owner.id, address.id).await.unwrap_err();
    assert!(matches!(err, AddressError::NotFound(_)));
}
