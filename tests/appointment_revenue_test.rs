// ABOUTME: Integration tests for appointment scheduling queries and revenue summaries
// ABOUTME: Covers range listings, dog history, status transitions, and cancelled-exclusion in totals

use chrono::{NaiveDate, NaiveTime};
use groomdesk_server::auth::hash_password;
use groomdesk_server::database::{test_utils::create_test_db, Database};
use groomdesk_server::models::{
    Appointment, AppointmentStatus, Dog, NewAppointment, PetOwner, Shop, User,
};
use uuid::Uuid;

struct Fixture {
    db: Database,
    shop: Shop,
    user: User,
    dog_id: Uuid,
}

async fn setup() -> Fixture {
    let db = create_test_db().await.unwrap();

    let user = User::new(
        "owner@example.com".to_string(),
        hash_password("hunter2hunter2").unwrap(),
        None,
    );
    db.create_user(&user).await.unwrap();

    let shop = Shop::new(
        "Happy Paws".to_string(),
        "happy-paws".to_string(),
        None,
        None,
        user.id,
    );
    db.create_shop_with_owner(&shop).await.unwrap();

    let pet_owner = PetOwner::new(
        shop.id,
        "Kim".to_string(),
        "010-1234-5678".to_string(),
        None,
    );
    db.create_pet_owner(&pet_owner).await.unwrap();
    let dog = Dog::new(shop.id, pet_owner.id, "Mongshil".to_string());
    db.create_dog(&dog).await.unwrap();

    Fixture {
        db,
        shop,
        user,
        dog_id: dog.id,
    }
}

async fn book(
    fx: &Fixture,
    date: (i32, u32, u32),
    total: i64,
    status: AppointmentStatus,
) -> Appointment {
    let appointment = Appointment::new(NewAppointment {
        shop_id: fx.shop.id,
        dog_id: fx.dog_id,
        created_by: fx.user.id,
        assigned_to: None,
        scheduled_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: Some(NaiveTime::from_hms_opt(11, 0, 0).unwrap()),
        grooming_label: None,
        memo: None,
        total_amount: total,
    });
    fx.db
        .create_appointment_with_lines(&appointment, &[])
        .await
        .unwrap();
    if status != AppointmentStatus::Scheduled {
        fx.db
            .set_appointment_status(appointment.id, status)
            .await
            .unwrap();
    }
    appointment
}

#[tokio::test]
async fn test_range_listing_is_inclusive_and_ordered() {
    let fx = setup().await;

    book(&fx, (2025, 6, 1), 30_000, AppointmentStatus::Scheduled).await;
    book(&fx, (2025, 6, 15), 45_000, AppointmentStatus::Scheduled).await;
    book(&fx, (2025, 7, 1), 60_000, AppointmentStatus::Scheduled).await;

    let june = fx
        .db
        .list_appointments(
            fx.shop.id,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(june.len(), 2);
    assert!(june[0].scheduled_date <= june[1].scheduled_date);
}

#[tokio::test]
async fn test_dog_history_is_newest_first() {
    let fx = setup().await;

    book(&fx, (2025, 5, 1), 30_000, AppointmentStatus::Settled).await;
    book(&fx, (2025, 6, 1), 45_000, AppointmentStatus::Scheduled).await;

    let history = fx.db.list_appointments_for_dog(fx.dog_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].scheduled_date >= history[1].scheduled_date);
}

#[tokio::test]
async fn test_revenue_summary_excludes_cancelled() {
    let fx = setup().await;

    book(&fx, (2025, 6, 2), 30_000, AppointmentStatus::Settled).await;
    book(&fx, (2025, 6, 9), 45_000, AppointmentStatus::Completed).await;
    book(&fx, (2025, 6, 16), 99_000, AppointmentStatus::Cancelled).await;
    // Outside the period
    book(&fx, (2025, 7, 2), 10_000, AppointmentStatus::Settled).await;

    let summary = fx
        .db
        .revenue_summary(
            fx.shop.id,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(summary.total_amount, 75_000);
    assert_eq!(summary.appointment_count, 2);

    // Cancelled appointments stay visible in the breakdown
    let cancelled = summary
        .by_status
        .iter()
        .find(|s| s.status == AppointmentStatus::Cancelled)
        .unwrap();
    assert_eq!(cancelled.count, 1);
    assert_eq!(cancelled.amount, 99_000);
}

#[tokio::test]
async fn test_empty_period_yields_zero_summary() {
    let fx = setup().await;

    let summary = fx
        .db
        .revenue_summary(
            fx.shop.id,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(summary.total_amount, 0);
    assert_eq!(summary.appointment_count, 0);
    assert!(summary.by_status.is_empty());
}

#[tokio::test]
async fn test_status_transition_persists() {
    let fx = setup().await;
    let appointment = book(&fx, (2025, 6, 2), 30_000, AppointmentStatus::Scheduled).await;

    assert!(appointment
        .status
        .can_transition_to(AppointmentStatus::InProgress));
    fx.db
        .set_appointment_status(appointment.id, AppointmentStatus::InProgress)
        .await
        .unwrap();

    let stored = fx.db.get_appointment(appointment.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AppointmentStatus::InProgress);
}

#[tokio::test]
async fn test_update_without_lines_leaves_lines_untouched() {
    let fx = setup().await;
    let mut appointment = book(&fx, (2025, 6, 2), 30_000, AppointmentStatus::Scheduled).await;

    // Attach one line directly
    use groomdesk_server::models::{AppointmentServiceLine, GroomingServiceType};
    let bath = GroomingServiceType::new(fx.shop.id, "Bath".to_string(), 30_000);
    fx.db.create_service_type(&bath).await.unwrap();
    fx.db
        .attach_service_lines(&[AppointmentServiceLine {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            grooming_type_id: bath.id,
            applied_price: 30_000,
            created_at: chrono::Utc::now(),
        }])
        .await
        .unwrap();

    // Field-only update with lines: None
    appointment.memo = Some("bring treats".to_string());
    fx.db
        .update_appointment_with_lines(&appointment, None)
        .await
        .unwrap();

    let lines = fx.db.list_service_lines(appointment.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    let stored = fx.db.get_appointment(appointment.id).await.unwrap().unwrap();
    assert_eq!(stored.memo.as_deref(), Some("bring treats"));
}
