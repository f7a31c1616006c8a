// ABOUTME: Integration tests for the staff invitation lifecycle service
// ABOUTME: Covers creation, token uniqueness, lazy expiry, acceptance, cancel, and resend semantics

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use groomdesk_server::auth::hash_password;
use groomdesk_server::database::{test_utils::create_test_db, Database};
use groomdesk_server::errors::{AppResult, ErrorCode};
use groomdesk_server::models::{Invitation, InvitationStatus, Shop, StaffRole, User};
use groomdesk_server::notifications::{EmailGateway, EmailMessage, EmailReceipt};
use groomdesk_server::services::InvitationService;
use uuid::Uuid;

/// Email gateway that records sent messages and can be told to fail
struct RecordingEmailGateway {
    sent: Mutex<Vec<EmailMessage>>,
    fail_next: AtomicBool,
}

impl RecordingEmailGateway {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        })
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last_message(&self) -> EmailMessage {
        self.sent.lock().unwrap().last().unwrap().clone()
    }
}

#[async_trait]
impl EmailGateway for RecordingEmailGateway {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailReceipt> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(groomdesk_server::errors::AppError::email_delivery_failed(
                "simulated provider outage",
            ));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(EmailReceipt {
            message_id: format!("msg-{}", Uuid::new_v4()),
        })
    }
}

async fn setup() -> (Database, Arc<RecordingEmailGateway>, InvitationService) {
    let db = create_test_db().await.unwrap();
    let email = RecordingEmailGateway::new();
    let service = InvitationService::new(
        db.clone(),
        email.clone(),
        "https://app.example.com".to_string(),
    );
    (db, email, service)
}

async fn seed_user(db: &Database, email: &str) -> User {
    let user = User::new(
        email.to_string(),
        hash_password("hunter2hunter2").unwrap(),
        None,
    );
    db.create_user(&user).await.unwrap();
    user
}

async fn seed_shop(db: &Database, owner: &User, slug: &str) -> Shop {
    let shop = Shop::new(
        "Happy Paws".to_string(),
        slug.to_string(),
        None,
        None,
        owner.id,
    );
    db.create_shop_with_owner(&shop).await.unwrap();
    shop
}

#[tokio::test]
async fn test_create_sends_email_and_withholds_token() {
    let (db, email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    let summary = service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();

    assert_eq!(summary.email, "groomer@example.com");
    assert_eq!(summary.role, StaffRole::Staff);
    assert_eq!(summary.status, InvitationStatus::Pending);
    assert_eq!(email.sent_count(), 1);

    // The token travels only via the email side channel
    let stored = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();
    let message = email.last_message();
    assert!(message.html_body.contains(&stored.token));
    let summary_json = serde_json::to_string(&summary).unwrap();
    assert!(!summary_json.contains(&stored.token));
}

#[tokio::test]
async fn test_tokens_are_pairwise_distinct() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    let mut tokens = Vec::new();
    for i in 0..8 {
        service
            .create(
                shop.id,
                owner.id,
                &format!("groomer{i}@example.com"),
                StaffRole::Staff,
            )
            .await
            .unwrap();
        let stored = db
            .find_pending_invitation(shop.id, &format!("groomer{i}@example.com"))
            .await
            .unwrap()
            .unwrap();
        tokens.push(stored.token);
    }

    let unique: std::collections::HashSet<_> = tokens.iter().collect();
    assert_eq!(unique.len(), tokens.len());
}

#[tokio::test]
async fn test_duplicate_pending_invitation_rejected() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();

    let err = service
        .create(shop.id, owner.id, "Groomer@Example.com", StaffRole::Staff)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicatePendingInvitation);
}

#[tokio::test]
async fn test_inviting_an_existing_employee_fails() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    let err = service
        .create(shop.id, owner.id, "owner@example.com", StaffRole::Staff)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyMember);
}

#[tokio::test]
async fn test_email_failure_rolls_back_created_invitation() {
    let (db, email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    email.fail_next.store(true, Ordering::SeqCst);
    let err = service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailDeliveryFailed);

    // No orphaned invitation remains
    assert!(db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_get_by_token_unknown_token() {
    let (_db, _email, service) = setup().await;

    let err = service.get_by_token("no-such-token").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_expiry_is_lazy_and_persisted() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    // Insert an already-expired pending invitation directly
    let mut invitation = Invitation::new(
        shop.id,
        owner.id,
        "groomer@example.com".to_string(),
        StaffRole::Staff,
        "expired-token".to_string(),
    );
    invitation.expires_at = Utc::now() - Duration::hours(1);
    db.insert_invitation(&invitation).await.unwrap();

    let err = service.get_by_token("expired-token").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvitationExpired);

    // The transition was persisted, not just derived
    let stored = db.get_invitation(invitation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Expired);

    // A second fetch reports the same outcome
    let err = service.get_by_token("expired-token").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvitationExpired);
}

#[tokio::test]
async fn test_accept_is_case_insensitive_on_email() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;
    let invitee = seed_user(&db, "groomer@example.com").await;

    service
        .create(shop.id, owner.id, "Groomer@Example.com", StaffRole::Manager)
        .await
        .unwrap();
    let stored = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();

    let accepted = service.accept(&stored.token, invitee.id).await.unwrap();
    assert_eq!(accepted.shop_id, shop.id);
    assert_eq!(accepted.role, StaffRole::Manager);

    // All three writes landed
    let membership = db.get_membership(shop.id, invitee.id).await.unwrap().unwrap();
    assert_eq!(membership.role, StaffRole::Manager);
    assert!(membership.is_active);

    let refreshed_user = db.get_user(invitee.id).await.unwrap().unwrap();
    assert_eq!(refreshed_user.primary_shop_id, Some(shop.id));

    let closed = db.get_invitation(stored.id).await.unwrap().unwrap();
    assert_eq!(closed.status, InvitationStatus::Accepted);
}

#[tokio::test]
async fn test_accept_rejects_a_different_account() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;
    let interloper = seed_user(&db, "someone-else@example.com").await;

    service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();
    let stored = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();

    let err = service.accept(&stored.token, interloper.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailMismatch);

    // The invitation is still pending and consumable by the right account
    let unchanged = db.get_invitation(stored.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, InvitationStatus::Pending);
}

#[tokio::test]
async fn test_double_accept_is_idempotent() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;
    let invitee = seed_user(&db, "groomer@example.com").await;

    service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();
    let stored = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();

    service.accept(&stored.token, invitee.id).await.unwrap();
    let err = service.accept(&stored.token, invitee.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvitationAlreadyProcessed);

    // Exactly one membership row exists
    let members = db.list_members(shop.id).await.unwrap();
    assert_eq!(
        members.iter().filter(|m| m.user_id == invitee.id).count(),
        1
    );
}

#[tokio::test]
async fn test_accept_when_already_member_closes_invitation() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    // The owner is already an active employee; an invitation for their
    // email can still exist if created before they joined
    let invitation = Invitation::new(
        shop.id,
        owner.id,
        "owner@example.com".to_string(),
        StaffRole::Staff,
        "stale-token".to_string(),
    );
    db.insert_invitation(&invitation).await.unwrap();

    let err = service.accept("stale-token", owner.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyMember);

    // Idempotent closure: the invitation is spent anyway
    let closed = db.get_invitation(invitation.id).await.unwrap().unwrap();
    assert_eq!(closed.status, InvitationStatus::Accepted);
}

#[tokio::test]
async fn test_cancel_only_from_pending() {
    let (db, _email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();
    let stored = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();

    service.cancel(stored.id, owner.id).await.unwrap();
    let cancelled = db.get_invitation(stored.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, InvitationStatus::Cancelled);

    // Terminal: neither cancellable again, resendable, nor acceptable
    let err = service.cancel(stored.id, owner.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    let err = service.resend(stored.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    let err = service.get_by_token(&stored.token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvitationAlreadyProcessed);
}

#[tokio::test]
async fn test_resend_refreshes_token_and_invalidates_old_one() {
    let (db, email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();
    let before = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();

    let summary = service.resend(before.id).await.unwrap();
    assert_eq!(email.sent_count(), 2);
    assert!(summary.expires_at >= before.expires_at);

    let after = db.get_invitation(before.id).await.unwrap().unwrap();
    assert_ne!(after.token, before.token);
    assert_eq!(after.status, InvitationStatus::Pending);

    // Old link is dead, new link works
    let err = service.get_by_token(&before.token).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    let view = service.get_by_token(&after.token).await.unwrap();
    assert_eq!(view.email, "groomer@example.com");
    assert_eq!(view.shop_name, "Happy Paws");
}

#[tokio::test]
async fn test_resend_email_failure_keeps_refreshed_invitation() {
    let (db, email, service) = setup().await;
    let owner = seed_user(&db, "owner@example.com").await;
    let shop = seed_shop(&db, &owner, "happy-paws").await;

    service
        .create(shop.id, owner.id, "groomer@example.com", StaffRole::Staff)
        .await
        .unwrap();
    let before = db
        .find_pending_invitation(shop.id, "groomer@example.com")
        .await
        .unwrap()
        .unwrap();

    email.fail_next.store(true, Ordering::SeqCst);
    let err = service.resend(before.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailDeliveryFailed);

    // Unlike create, the refreshed row survives: a valid invitation
    // existed before this call
    let after = db.get_invitation(before.id).await.unwrap().unwrap();
    assert_eq!(after.status, InvitationStatus::Pending);
    assert_ne!(after.token, before.token);
}
