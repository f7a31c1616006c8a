// ABOUTME: Integration tests for shop creation, owner bootstrap, and membership constraints
// ABOUTME: Verifies the unique (shop, user) constraint acts as the double-insert race-breaker

use groomdesk_server::auth::hash_password;
use groomdesk_server::database::{test_utils::create_test_db, Database};
use groomdesk_server::models::{Shop, ShopMembership, StaffRole, User};

async fn seed_user(db: &Database, email: &str) -> User {
    let user = User::new(
        email.to_string(),
        hash_password("hunter2hunter2").unwrap(),
        None,
    );
    db.create_user(&user).await.unwrap();
    user
}

#[tokio::test]
async fn test_shop_creation_bootstraps_owner_membership() {
    let db = create_test_db().await.unwrap();
    let user = seed_user(&db, "owner@example.com").await;

    let shop = Shop::new(
        "Happy Paws".to_string(),
        "happy-paws".to_string(),
        Some("02-555-0199".to_string()),
        None,
        user.id,
    );
    let membership = db.create_shop_with_owner(&shop).await.unwrap();

    assert_eq!(membership.role, StaffRole::Owner);
    assert_eq!(membership.shop_id, shop.id);
    assert_eq!(membership.user_id, user.id);

    // The creator's primary shop pointer moved in the same transaction
    let refreshed = db.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(refreshed.primary_shop_id, Some(shop.id));

    let shops = db.list_shops_for_user(user.id).await.unwrap();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].slug, "happy-paws");
}

#[tokio::test]
async fn test_duplicate_membership_rejected_by_unique_constraint() {
    let db = create_test_db().await.unwrap();
    let owner = seed_user(&db, "owner@example.com").await;
    let staff = seed_user(&db, "staff@example.com").await;

    let shop = Shop::new(
        "Happy Paws".to_string(),
        "happy-paws".to_string(),
        None,
        None,
        owner.id,
    );
    db.create_shop_with_owner(&shop).await.unwrap();

    db.add_member(&ShopMembership::new(shop.id, staff.id, StaffRole::Staff))
        .await
        .unwrap();

    // A second insert for the same (shop, user) pair fails at the storage
    // layer regardless of any application pre-check
    let err = db
        .add_member(&ShopMembership::new(shop.id, staff.id, StaffRole::Manager))
        .await
        .unwrap_err();
    assert_eq!(err.code, groomdesk_server::errors::ErrorCode::DatabaseError);

    let members = db.list_members(shop.id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn test_deactivated_member_loses_listing_but_keeps_history() {
    let db = create_test_db().await.unwrap();
    let owner = seed_user(&db, "owner@example.com").await;
    let staff = seed_user(&db, "staff@example.com").await;

    let shop = Shop::new(
        "Happy Paws".to_string(),
        "happy-paws".to_string(),
        None,
        None,
        owner.id,
    );
    db.create_shop_with_owner(&shop).await.unwrap();
    db.add_member(&ShopMembership::new(shop.id, staff.id, StaffRole::Staff))
        .await
        .unwrap();

    db.deactivate_member(shop.id, staff.id).await.unwrap();

    let members = db.list_members(shop.id).await.unwrap();
    assert!(members.iter().all(|m| m.user_id != staff.id));

    // The row survives for history with the active flag off
    let membership = db.get_membership(shop.id, staff.id).await.unwrap().unwrap();
    assert!(!membership.is_active);
}

#[tokio::test]
async fn test_duplicate_slug_rejected() {
    let db = create_test_db().await.unwrap();
    let owner = seed_user(&db, "owner@example.com").await;
    let other = seed_user(&db, "other@example.com").await;

    let shop = Shop::new(
        "Happy Paws".to_string(),
        "happy-paws".to_string(),
        None,
        None,
        owner.id,
    );
    db.create_shop_with_owner(&shop).await.unwrap();

    let rival = Shop::new(
        "Other Paws".to_string(),
        "happy-paws".to_string(),
        None,
        None,
        other.id,
    );
    assert!(db.create_shop_with_owner(&rival).await.is_err());
}
