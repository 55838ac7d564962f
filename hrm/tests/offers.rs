mod common;

use chrono::{Duration, Utc};
use entity::employee::Department;
use entity::offer_letter::{self, Currency, Status};
use entity::recruitment::EmploymentType;
use hrm::offers::{self, NewOffer, UpdateOffer};
use hrm::HrmError;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};

/// Simulates the validity window passing without running a write path.
async fn backdate_validity(db: &DatabaseConnection, id: uuid::Uuid) {
    let existing = offer_letter::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut model: offer_letter::ActiveModel = existing.into();
    model.offer_valid_until = Set((Utc::now() - Duration::hours(1)).into());
    model.update(db).await.unwrap();
}

fn offer_for(email: &str, valid_until: chrono::DateTime<Utc>) -> NewOffer {
    NewOffer {
        candidate_name: "Riley Chen".into(),
        candidate_email: email.into(),
        position: "Engineer".into(),
        department: Department::Engineering,
        salary: 100_000.0,
        currency: None,
        start_date: Utc::now().date_naive() + Duration::days(30),
        reporting_manager: "Priya Nair".into(),
        work_location: "Remote".into(),
        employment_type: EmploymentType::FullTime,
        benefits: None,
        probation_period_days: None,
        notice_period_days: None,
        offer_valid_until: valid_until,
        hr_contact_name: "Dana Wells".into(),
        hr_contact_email: "dana@example.com".into(),
        hr_contact_phone: "+1-555-0142".into(),
        additional_notes: None,
    }
}

#[tokio::test]
async fn create_applies_defaults() {
    let db = common::setup().await;
    let created = offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();

    assert_eq!(created.status, Status::Draft);
    assert_eq!(created.currency, Currency::Usd);
    assert_eq!(created.probation_period_days, 90);
    assert_eq!(created.notice_period_days, 30);
    let benefits = created.benefits.as_array().unwrap();
    assert_eq!(benefits.len(), 6);
    assert!(created.sent_date.is_none());
}

#[tokio::test]
async fn one_active_offer_per_candidate() {
    let db = common::setup().await;
    offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();

    let second = offers::create(
        &db,
        offer_for("RILEY@example.com", Utc::now() + Duration::days(14)),
    )
    .await;
    assert!(matches!(
        second,
        Err(HrmError::Conflict {
            field: "candidate_email"
        })
    ));
}

#[tokio::test]
async fn declined_offer_does_not_block_a_new_one() {
    let db = common::setup().await;
    let first = offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();
    offers::send(&db, first.id).await.unwrap();
    offers::decline(&db, first.id).await.unwrap();

    offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn send_stamps_sent_date_once() {
    let db = common::setup().await;
    let created = offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();

    let sent = offers::send(&db, created.id).await.unwrap();
    assert_eq!(sent.status, Status::Sent);
    let first_sent_date = sent.sent_date.unwrap();

    // Sending twice is invalid, and later saves keep the stamp.
    assert!(matches!(
        offers::send(&db, created.id).await,
        Err(HrmError::Validation(_))
    ));
    let updated = offers::update(
        &db,
        created.id,
        UpdateOffer {
            salary: Some(105_000.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.sent_date, Some(first_sent_date));
}

#[tokio::test]
async fn accept_and_decline_require_sent_status() {
    let db = common::setup().await;
    let created = offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();

    // A draft cannot be accepted.
    assert!(matches!(
        offers::accept(&db, created.id).await,
        Err(HrmError::Validation(_))
    ));

    offers::send(&db, created.id).await.unwrap();
    let accepted = offers::accept(&db, created.id).await.unwrap();
    assert_eq!(accepted.status, Status::Accepted);
    assert!(accepted.response_date.is_some());

    // And a response is final.
    assert!(matches!(
        offers::decline(&db, created.id).await,
        Err(HrmError::Validation(_))
    ));
}

#[tokio::test]
async fn overdue_offer_expires_instead_of_accepting() {
    let db = common::setup().await;
    let created = offers::create(
        &db,
        offer_for("riley@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();
    offers::send(&db, created.id).await.unwrap();
    backdate_validity(&db, created.id).await;

    let result = offers::accept(&db, created.id).await;
    assert!(matches!(result, Err(HrmError::Validation(_))));
    let stored = offers::get(&db, created.id).await.unwrap();
    assert_eq!(stored.status, Status::Expired);
}

#[tokio::test]
async fn dashboard_averages_outstanding_salaries_and_tracks_acceptance() {
    let db = common::setup().await;

    let mut draft = offer_for("draft@example.com", Utc::now() + Duration::days(14));
    draft.salary = 90_000.0;
    offers::create(&db, draft).await.unwrap();

    let mut pending = offer_for("pending@example.com", Utc::now() + Duration::days(14));
    pending.salary = 100_000.0;
    let pending = offers::create(&db, pending).await.unwrap();
    offers::send(&db, pending.id).await.unwrap();

    let mut hired = offer_for("hired@example.com", Utc::now() + Duration::days(14));
    hired.salary = 120_000.0;
    let hired = offers::create(&db, hired).await.unwrap();
    offers::send(&db, hired.id).await.unwrap();
    offers::accept(&db, hired.id).await.unwrap();

    let dashboard = offers::dashboard(&db).await.unwrap();
    assert_eq!(dashboard.total, 3);
    assert_eq!(dashboard.draft, 1);
    assert_eq!(dashboard.sent, 1);
    assert_eq!(dashboard.accepted, 1);
    assert_eq!(dashboard.declined, 0);
    assert_eq!(dashboard.expired, 0);
    // The draft's salary stays out of the average.
    assert_eq!(dashboard.average_salary, 110_000.0);
    assert_eq!(dashboard.acceptance_rate, 33.33);
    let engineering = dashboard
        .by_department
        .iter()
        .find(|row| matches!(row.department, Department::Engineering))
        .unwrap();
    assert_eq!(engineering.count, 3);
}

#[tokio::test]
async fn dashboard_on_an_empty_table_is_all_zeroes() {
    let db = common::setup().await;
    let dashboard = offers::dashboard(&db).await.unwrap();
    assert_eq!(dashboard.total, 0);
    assert_eq!(dashboard.average_salary, 0.0);
    assert_eq!(dashboard.acceptance_rate, 0.0);
    assert!(dashboard.by_department.is_empty());
}

#[tokio::test]
async fn expire_overdue_sweeps_sent_offers() {
    let db = common::setup().await;
    let overdue = offers::create(
        &db,
        offer_for("late@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();
    offers::send(&db, overdue.id).await.unwrap();
    backdate_validity(&db, overdue.id).await;

    let fresh = offers::create(
        &db,
        offer_for("fresh@example.com", Utc::now() + Duration::days(14)),
    )
    .await
    .unwrap();
    offers::send(&db, fresh.id).await.unwrap();

    let expired = offers::expire_overdue(&db).await.unwrap();
    assert_eq!(expired, 1);
    assert_eq!(
        offers::get(&db, overdue.id).await.unwrap().status,
        Status::Expired
    );
    assert_eq!(
        offers::get(&db, fresh.id).await.unwrap().status,
        Status::Sent
    );
}
