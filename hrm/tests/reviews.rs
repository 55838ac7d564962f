mod common;

use chrono::NaiveDate;
use entity::review::{ReviewType, Status};
use hrm::reviews::{self, CategoryScore, NewReview, ReviewFilter, UpdateReview};
use hrm::HrmError;

fn score(rating: i16) -> CategoryScore {
    CategoryScore {
        rating,
        comments: None,
    }
}

fn review_input(
    employee_id: uuid::Uuid,
    reviewer_id: uuid::Uuid,
    ratings: [i16; 5],
) -> NewReview {
    NewReview {
        employee_id,
        reviewer_id,
        period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        period_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        review_type: ReviewType::Annual,
        performance: score(ratings[0]),
        communication: score(ratings[1]),
        teamwork: score(ratings[2]),
        leadership: score(ratings[3]),
        problem_solving: score(ratings[4]),
        strengths: vec!["Reliable delivery".into()],
        areas_for_improvement: vec!["Mentoring".into()],
        goals: vec!["Lead a project".into()],
        feedback: "Strong year overall.".into(),
    }
}

#[tokio::test]
async fn overall_rating_is_the_rounded_category_mean() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let mgr = common::insert_employee(&db, "Mgr", "mgr@example.com", "EMP-0002", 120_000.0).await;

    let created = reviews::create(&db, review_input(emp.id, mgr.id, [4, 5, 3, 4, 5]))
        .await
        .unwrap();
    assert_eq!(created.overall_rating, 4.2);
    assert_eq!(created.status, Status::Draft);
    assert_eq!(created.employee_name, "Ada");
    assert_eq!(created.reviewer_name, "Mgr");
}

#[tokio::test]
async fn out_of_range_ratings_are_rejected() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let mgr = common::insert_employee(&db, "Mgr", "mgr@example.com", "EMP-0002", 120_000.0).await;

    let zero = reviews::create(&db, review_input(emp.id, mgr.id, [0, 5, 3, 4, 5])).await;
    assert!(matches!(zero, Err(HrmError::Validation(_))));
    let six = reviews::create(&db, review_input(emp.id, mgr.id, [4, 5, 3, 4, 6])).await;
    assert!(matches!(six, Err(HrmError::Validation(_))));
}

#[tokio::test]
async fn update_recomputes_the_aggregate() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let mgr = common::insert_employee(&db, "Mgr", "mgr@example.com", "EMP-0002", 120_000.0).await;
    let created = reviews::create(&db, review_input(emp.id, mgr.id, [4, 4, 4, 4, 4]))
        .await
        .unwrap();
    assert_eq!(created.overall_rating, 4.0);

    let updated = reviews::update(
        &db,
        created.id,
        UpdateReview {
            teamwork: Some(score(5)),
            problem_solving: Some(score(5)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.overall_rating, 4.4);
}

#[tokio::test]
async fn lifecycle_is_draft_completed_acknowledged() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let mgr = common::insert_employee(&db, "Mgr", "mgr@example.com", "EMP-0002", 120_000.0).await;
    let created = reviews::create(&db, review_input(emp.id, mgr.id, [4, 4, 4, 4, 4]))
        .await
        .unwrap();

    // A draft cannot be acknowledged.
    assert!(matches!(
        reviews::acknowledge(&db, created.id, None).await,
        Err(HrmError::Validation(_))
    ));

    let completed = reviews::complete(&db, created.id).await.unwrap();
    assert_eq!(completed.status, Status::Completed);
    assert!(completed.completed_date.is_some());
    assert!(matches!(
        reviews::complete(&db, created.id).await,
        Err(HrmError::Validation(_))
    ));

    let acknowledged = reviews::acknowledge(&db, created.id, Some("Thanks".into()))
        .await
        .unwrap();
    assert_eq!(acknowledged.status, Status::Acknowledged);
    assert!(acknowledged.acknowledged_date.is_some());
    assert_eq!(acknowledged.employee_comments.as_deref(), Some("Thanks"));

    // Acknowledged reviews are frozen.
    let frozen = reviews::update(
        &db,
        created.id,
        UpdateReview {
            feedback: Some("revised".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(frozen, Err(HrmError::Validation(_))));
}

#[tokio::test]
async fn reviewer_must_exist() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;

    let result = reviews::create(&db, review_input(emp.id, uuid::Uuid::new_v4(), [4, 4, 4, 4, 4])).await;
    assert!(matches!(
        result,
        Err(HrmError::NotFound { entity: "reviewer" })
    ));
}

#[tokio::test]
async fn dashboard_aggregates_only_finished_reviews() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let peer = common::insert_employee(&db, "Bob", "bob@example.com", "EMP-0002", 85_000.0).await;
    let mgr = common::insert_employee(&db, "Mgr", "mgr@example.com", "EMP-0003", 120_000.0).await;

    let solid = reviews::create(&db, review_input(emp.id, mgr.id, [4, 4, 4, 4, 4]))
        .await
        .unwrap();
    reviews::complete(&db, solid.id).await.unwrap();

    let stellar = reviews::create(&db, review_input(peer.id, mgr.id, [5, 5, 5, 5, 5]))
        .await
        .unwrap();
    reviews::complete(&db, stellar.id).await.unwrap();
    reviews::acknowledge(&db, stellar.id, None).await.unwrap();

    // Still a draft; its rating must stay out of the aggregates.
    reviews::create(&db, review_input(mgr.id, mgr.id, [1, 1, 1, 1, 1]))
        .await
        .unwrap();

    let dashboard = reviews::dashboard(&db).await.unwrap();
    assert_eq!(dashboard.total, 3);
    assert_eq!(dashboard.draft, 1);
    assert_eq!(dashboard.completed, 1);
    assert_eq!(dashboard.acknowledged, 1);
    assert_eq!(dashboard.average_rating, 4.5);
    assert_eq!(dashboard.rating_distribution.len(), 2);
    assert_eq!(dashboard.rating_distribution[0].rating, 4.0);
    assert_eq!(dashboard.rating_distribution[0].count, 1);
    assert_eq!(dashboard.rating_distribution[1].rating, 5.0);
    assert_eq!(dashboard.rating_distribution[1].count, 1);
}

#[tokio::test]
async fn average_rating_spans_an_employees_reviews() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let mgr = common::insert_employee(&db, "Mgr", "mgr@example.com", "EMP-0002", 120_000.0).await;

    assert_eq!(reviews::average_rating(&db, emp.id).await.unwrap(), None);

    let mut first = review_input(emp.id, mgr.id, [4, 4, 4, 4, 4]);
    first.review_type = ReviewType::SemiAnnual;
    first.period_end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    reviews::create(&db, first).await.unwrap();
    reviews::create(&db, review_input(emp.id, mgr.id, [5, 5, 5, 5, 5]))
        .await
        .unwrap();

    let average = reviews::average_rating(&db, emp.id).await.unwrap().unwrap();
    assert!((average - 4.5).abs() < 1e-9);

    let annual_only = reviews::list(
        &db,
        ReviewFilter {
            employee_id: Some(emp.id),
            review_type: Some(ReviewType::Annual),
            ..Default::default()
        },
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(annual_only.len(), 1);
}
