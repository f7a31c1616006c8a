// ABOUTME: Integration tests for JWT issuance and refresh-token rotation against the database
// ABOUTME: Covers rotation revoking the presented token, revoked reuse, and expiry rejection

use chrono::{Duration, Utc};
use groomdesk_server::auth::{hash_password, verify_password, AuthManager};
use groomdesk_server::crypto;
use groomdesk_server::database::{test_utils::create_test_db, Database};
use groomdesk_server::models::User;

async fn setup() -> (Database, AuthManager, User) {
    let db = create_test_db().await.unwrap();
    let manager = AuthManager::new(b"integration-test-secret-material".to_vec(), 24);
    let user = User::new(
        "groomer@example.com".to_string(),
        hash_password("hunter2hunter2").unwrap(),
        Some("Groomer".to_string()),
    );
    db.create_user(&user).await.unwrap();
    (db, manager, user)
}

#[tokio::test]
async fn test_access_token_round_trip_through_header() {
    let (_db, manager, user) = setup().await;

    let token = manager.generate_token(&user).unwrap();
    let auth = manager
        .authenticate_header(Some(&format!("Bearer {token}")))
        .unwrap();

    assert_eq!(auth.user_id, user.id);
    assert_eq!(auth.email, user.email);
}

#[tokio::test]
async fn test_password_verification() {
    let (db, _manager, user) = setup().await;

    let stored = db.get_user_by_email("groomer@example.com").await.unwrap().unwrap();
    assert_eq!(stored.id, user.id);
    assert!(verify_password("hunter2hunter2", &stored.password_hash).unwrap());
    assert!(!verify_password("wrong-password", &stored.password_hash).unwrap());
}

#[tokio::test]
async fn test_rotation_revokes_the_presented_token() {
    let (db, manager, user) = setup().await;

    let issued = manager.issue_refresh_token().unwrap();
    db.insert_refresh_token(user.id, &issued.digest, issued.expires_at)
        .await
        .unwrap();

    let (rotated_user, replacement) = manager
        .rotate_refresh_token(&db, &issued.token)
        .await
        .unwrap();
    assert_eq!(rotated_user, user.id);
    assert_ne!(replacement.token, issued.token);

    // The old token is revoked at rest and rejected on reuse
    let old_record = db
        .get_refresh_token_by_digest(&issued.digest)
        .await
        .unwrap()
        .unwrap();
    assert!(old_record.revoked);

    let err = manager
        .rotate_refresh_token(&db, &issued.token)
        .await
        .unwrap_err();
    assert_eq!(err.code, groomdesk_server::errors::ErrorCode::AuthInvalid);

    // The replacement rotates cleanly
    manager
        .rotate_refresh_token(&db, &replacement.token)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_and_expired_refresh_tokens_rejected() {
    let (db, manager, user) = setup().await;

    let unknown = crypto::generate_security_token().unwrap();
    assert!(manager.rotate_refresh_token(&db, &unknown).await.is_err());

    // Insert an expired token directly
    let expired = manager.issue_refresh_token().unwrap();
    db.insert_refresh_token(user.id, &expired.digest, Utc::now() - Duration::days(1))
        .await
        .unwrap();

    let err = manager
        .rotate_refresh_token(&db, &expired.token)
        .await
        .unwrap_err();
    assert_eq!(err.code, groomdesk_server::errors::ErrorCode::AuthExpired);
}

#[tokio::test]
async fn test_revoke_all_for_user() {
    let (db, manager, user) = setup().await;

    for _ in 0..3 {
        let issued = manager.issue_refresh_token().unwrap();
        db.insert_refresh_token(user.id, &issued.digest, issued.expires_at)
            .await
            .unwrap();
    }

    let revoked = db.revoke_refresh_tokens_for_user(user.id).await.unwrap();
    assert_eq!(revoked, 3);
}
