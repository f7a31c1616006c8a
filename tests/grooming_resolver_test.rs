// ABOUTME: Integration tests for grooming service-line validation and pricing resolution
// ABOUTME: Covers all-or-nothing validation, price defaults, replace semantics, and legacy absorption

use chrono::{NaiveDate, NaiveTime};
use groomdesk_server::auth::hash_password;
use groomdesk_server::database::{test_utils::create_test_db, Database};
use groomdesk_server::errors::ErrorCode;
use groomdesk_server::models::{
    Appointment, GroomingServiceType, NewAppointment, Shop, User,
};
use groomdesk_server::services::{GroomingResolver, ServiceLineRequest};
use uuid::Uuid;

struct Fixture {
    db: Database,
    resolver: GroomingResolver,
    shop: Shop,
    owner: User,
    bath: GroomingServiceType,
    cut: GroomingServiceType,
    trim: GroomingServiceType,
}

async fn setup() -> Fixture {
    let db = create_test_db().await.unwrap();
    let resolver = GroomingResolver::new(db.clone());

    let owner = User::new(
        "owner@example.com".to_string(),
        hash_password("hunter2hunter2").unwrap(),
        None,
    );
    db.create_user(&owner).await.unwrap();

    let shop = Shop::new(
        "Happy Paws".to_string(),
        "happy-paws".to_string(),
        None,
        None,
        owner.id,
    );
    db.create_shop_with_owner(&shop).await.unwrap();

    let bath = GroomingServiceType::new(shop.id, "Bath".to_string(), 30_000);
    let cut = GroomingServiceType::new(shop.id, "Cut".to_string(), 45_000);
    let mut trim = GroomingServiceType::new(shop.id, "Trim".to_string(), 20_000);
    trim.is_active = false;
    for service in [&bath, &cut, &trim] {
        db.create_service_type(service).await.unwrap();
    }

    Fixture {
        db,
        resolver,
        shop,
        owner,
        bath,
        cut,
        trim,
    }
}

async fn book_appointment(fx: &Fixture) -> Appointment {
    let appointment = Appointment::new(NewAppointment {
        shop_id: fx.shop.id,
        dog_id: seed_dog(fx).await,
        created_by: fx.owner.id,
        assigned_to: None,
        scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: None,
        grooming_label: None,
        memo: None,
        total_amount: 0,
    });
    fx.db
        .create_appointment_with_lines(&appointment, &[])
        .await
        .unwrap();
    appointment
}

async fn seed_dog(fx: &Fixture) -> Uuid {
    use groomdesk_server::models::{Dog, PetOwner};
    let pet_owner = PetOwner::new(
        fx.shop.id,
        "Kim".to_string(),
        "010-1234-5678".to_string(),
        None,
    );
    fx.db.create_pet_owner(&pet_owner).await.unwrap();
    let dog = Dog::new(fx.shop.id, pet_owner.id, "Mongshil".to_string());
    fx.db.create_dog(&dog).await.unwrap();
    dog.id
}

fn line(service: &GroomingServiceType, price: Option<i64>) -> ServiceLineRequest {
    ServiceLineRequest {
        grooming_type_id: service.id,
        applied_price: price,
    }
}

#[tokio::test]
async fn test_price_defaults_to_catalog_price() {
    let fx = setup().await;

    let validated = fx
        .resolver
        .validate_service_lines(fx.shop.id, &[line(&fx.bath, None)])
        .await
        .unwrap();

    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].applied_price, 30_000);
    assert_eq!(validated[0].name, "Bath");
}

#[tokio::test]
async fn test_explicit_zero_price_is_honored() {
    let fx = setup().await;

    let validated = fx
        .resolver
        .validate_service_lines(fx.shop.id, &[line(&fx.bath, Some(0))])
        .await
        .unwrap();

    assert_eq!(validated[0].applied_price, 0);
}

#[tokio::test]
async fn test_unknown_service_type_rejected() {
    let fx = setup().await;

    let err = fx
        .resolver
        .validate_service_lines(
            fx.shop.id,
            &[ServiceLineRequest {
                grooming_type_id: Uuid::new_v4(),
                applied_price: None,
            }],
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UnknownServiceType);
}

#[tokio::test]
async fn test_cross_shop_reference_rejected() {
    let fx = setup().await;

    // A second shop with its own catalog
    let other_owner = User::new(
        "rival@example.com".to_string(),
        hash_password("hunter2hunter2").unwrap(),
        None,
    );
    fx.db.create_user(&other_owner).await.unwrap();
    let other_shop = Shop::new(
        "Rival Groomers".to_string(),
        "rival-groomers".to_string(),
        None,
        None,
        other_owner.id,
    );
    fx.db.create_shop_with_owner(&other_shop).await.unwrap();
    let foreign = GroomingServiceType::new(other_shop.id, "Spa".to_string(), 60_000);
    fx.db.create_service_type(&foreign).await.unwrap();

    // Shop B's service cannot be attached in shop A, even though it exists
    let err = fx
        .resolver
        .validate_service_lines(fx.shop.id, &[line(&foreign, None)])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UnknownServiceType);
}

#[tokio::test]
async fn test_inactive_service_type_named_in_error() {
    let fx = setup().await;

    let err = fx
        .resolver
        .validate_service_lines(fx.shop.id, &[line(&fx.trim, None)])
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InactiveServiceType);
    assert!(err.message.contains("Trim"));
}

#[tokio::test]
async fn test_validation_is_all_or_nothing() {
    let fx = setup().await;
    let appointment = book_appointment(&fx).await;

    // One valid line plus one inactive line: the whole set is rejected
    let err = fx
        .resolver
        .validate_service_lines(
            fx.shop.id,
            &[line(&fx.bath, None), line(&fx.trim, None)],
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InactiveServiceType);

    // Nothing was written for the valid line either
    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_attach_inserts_validated_lines() {
    let fx = setup().await;
    let appointment = book_appointment(&fx).await;

    let validated = fx
        .resolver
        .validate_service_lines(
            fx.shop.id,
            &[line(&fx.bath, None), line(&fx.cut, Some(50_000))],
        )
        .await
        .unwrap();
    fx.resolver
        .attach_to_appointment(appointment.id, validated)
        .await
        .unwrap();

    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    let by_name: std::collections::HashMap<_, _> = lines
        .iter()
        .map(|l| (l.name.as_str(), l.applied_price))
        .collect();
    assert_eq!(by_name["Bath"], 30_000);
    assert_eq!(by_name["Cut"], 50_000);
}

#[tokio::test]
async fn test_replace_is_a_full_replace_with_reresolved_prices() {
    let fx = setup().await;
    let appointment = book_appointment(&fx).await;

    // Initial set: bath at a discounted price, cut at default
    let initial = fx
        .resolver
        .validate_service_lines(
            fx.shop.id,
            &[line(&fx.bath, Some(25_000)), line(&fx.cut, None)],
        )
        .await
        .unwrap();
    fx.resolver
        .attach_to_appointment(appointment.id, initial)
        .await
        .unwrap();

    // New shop-wide default for cut, then replace with [cut, spa]
    let spa = GroomingServiceType::new(fx.shop.id, "Spa".to_string(), 60_000);
    fx.db.create_service_type(&spa).await.unwrap();

    let replacement = fx
        .resolver
        .validate_service_lines(fx.shop.id, &[line(&fx.cut, None), line(&spa, None)])
        .await
        .unwrap();
    fx.resolver
        .replace_appointment_lines(appointment.id, replacement)
        .await
        .unwrap();

    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    assert_eq!(lines.len(), 2);
    let names: std::collections::HashSet<_> =
        lines.iter().map(|l| l.name.as_str()).collect();
    assert!(names.contains("Cut") && names.contains("Spa"));
    // Bath is gone; Cut's price came from the new request, not carried over
    let cut_line = lines.iter().find(|l| l.name == "Cut").unwrap();
    assert_eq!(cut_line.applied_price, 45_000);
}

#[tokio::test]
async fn test_replace_with_empty_set_clears_lines() {
    let fx = setup().await;
    let appointment = book_appointment(&fx).await;

    let initial = fx
        .resolver
        .validate_service_lines(fx.shop.id, &[line(&fx.bath, None)])
        .await
        .unwrap();
    fx.resolver
        .attach_to_appointment(appointment.id, initial)
        .await
        .unwrap();

    fx.resolver
        .replace_appointment_lines(appointment.id, Vec::new())
        .await
        .unwrap();

    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_display_label_synthesized_from_lines() {
    let fx = setup().await;
    let appointment = book_appointment(&fx).await;

    let validated = fx
        .resolver
        .validate_service_lines(
            fx.shop.id,
            &[line(&fx.bath, None), line(&fx.cut, None)],
        )
        .await
        .unwrap();
    fx.resolver
        .attach_to_appointment(appointment.id, validated)
        .await
        .unwrap();

    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    let names: Vec<String> = lines.iter().map(|l| l.name.clone()).collect();
    assert_eq!(
        GroomingResolver::display_label(&names),
        Some("Bath, Cut".to_string())
    );
}

#[tokio::test]
async fn test_legacy_label_absorbed_without_attaching_lines() {
    let fx = setup().await;
    let appointment = book_appointment(&fx).await;

    let first = fx
        .resolver
        .absorb_legacy_label(fx.shop.id, "  Nail Clipping  ")
        .await
        .unwrap()
        .unwrap();

    let created = fx
        .db
        .find_service_type_by_name(fx.shop.id, "Nail Clipping")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.id, first);
    assert_eq!(created.default_price, 0);

    // Absorbing again finds instead of duplicating
    let second = fx
        .resolver
        .absorb_legacy_label(fx.shop.id, "Nail Clipping")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second, first);

    // Blank labels are ignored
    assert!(fx
        .resolver
        .absorb_legacy_label(fx.shop.id, "   ")
        .await
        .unwrap()
        .is_none());

    // Absorption never creates appointment associations by itself
    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    assert!(lines.is_empty());
}
