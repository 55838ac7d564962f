mod common;

use entity::payroll::Status;
use hrm::payroll::{self, NewPayroll, PayrollFilter, UpdatePayroll};
use hrm::HrmError;

fn basic_record(employee_id: uuid::Uuid, month: i16, year: i32) -> NewPayroll {
    NewPayroll {
        employee_id,
        period_month: month,
        period_year: year,
        basic_salary: 50_000.0,
        allowance_hra: 2_000.0,
        allowance_transport: 1_000.0,
        allowance_medical: 500.0,
        allowance_other: 0.0,
        overtime_hours: 10.0,
        overtime_rate: 100.0,
        deduction_tax: 3_000.0,
        deduction_pf: 800.0,
        deduction_insurance: 200.0,
        deduction_other: 0.0,
    }
}

#[tokio::test]
async fn derived_fields_are_computed_on_create() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;

    let created = payroll::create(&db, basic_record(emp.id, 1, 2024)).await.unwrap();
    assert_eq!(created.overtime_amount, 1_000.0);
    assert_eq!(created.gross_salary, 54_500.0);
    assert_eq!(created.total_deductions, 4_000.0);
    assert_eq!(created.net_salary, 50_500.0);
    assert_eq!(created.status, Status::Draft);
}

#[tokio::test]
async fn update_always_recomputes_totals() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let created = payroll::create(&db, basic_record(emp.id, 1, 2024)).await.unwrap();

    let updated = payroll::update(
        &db,
        created.id,
        UpdatePayroll {
            overtime_hours: Some(0.0),
            deduction_tax: Some(5_000.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.overtime_amount, 0.0);
    assert_eq!(updated.gross_salary, 53_500.0);
    assert_eq!(updated.total_deductions, 6_000.0);
    assert_eq!(updated.net_salary, 47_500.0);
}

#[tokio::test]
async fn one_record_per_employee_per_period() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    payroll::create(&db, basic_record(emp.id, 2, 2024)).await.unwrap();

    let duplicate = payroll::create(&db, basic_record(emp.id, 2, 2024)).await;
    assert!(matches!(
        duplicate,
        Err(HrmError::Conflict {
            field: "pay_period"
        })
    ));

    // A different month for the same employee is fine.
    payroll::create(&db, basic_record(emp.id, 3, 2024)).await.unwrap();
}

#[tokio::test]
async fn period_bounds_are_validated() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;

    assert!(matches!(
        payroll::create(&db, basic_record(emp.id, 0, 2024)).await,
        Err(HrmError::Validation(_))
    ));
    assert!(matches!(
        payroll::create(&db, basic_record(emp.id, 13, 2024)).await,
        Err(HrmError::Validation(_))
    ));
    assert!(matches!(
        payroll::create(&db, basic_record(emp.id, 6, 2019)).await,
        Err(HrmError::Validation(_))
    ));
}

#[tokio::test]
async fn processing_flow_enforces_status_order() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let created = payroll::create(&db, basic_record(emp.id, 4, 2024)).await.unwrap();

    // Draft cannot be paid directly.
    assert!(matches!(
        payroll::mark_paid(&db, created.id).await,
        Err(HrmError::Validation(_))
    ));

    let processed = payroll::process(&db, created.id).await.unwrap();
    assert_eq!(processed.status, Status::Processed);
    assert!(processed.processed_date.is_some());

    // Processing twice is invalid.
    assert!(matches!(
        payroll::process(&db, created.id).await,
        Err(HrmError::Validation(_))
    ));

    let paid = payroll::mark_paid(&db, created.id).await.unwrap();
    assert_eq!(paid.status, Status::Paid);
    assert!(paid.payment_date.is_some());
}

#[tokio::test]
async fn bulk_generation_is_idempotent() {
    let db = common::setup().await;
    for i in 1..=5 {
        common::insert_employee(
            &db,
            &format!("Emp {}", i),
            &format!("emp{}@example.com", i),
            &format!("EMP-{:04}", i),
            60_000.0 + f64::from(i) * 1_000.0,
        )
        .await;
    }

    let first = payroll::bulk_generate(&db, 5, 2024).await.unwrap();
    assert_eq!(first.created, 5);
    assert_eq!(first.total, 5);

    let second = payroll::bulk_generate(&db, 5, 2024).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.total, 5);

    let records = payroll::list(
        &db,
        PayrollFilter {
            period_month: Some(5),
            period_year: Some(2024),
            ..Default::default()
        },
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(records.len(), 5);
    // Generated drafts start from the employee's salary with no extras.
    assert!(records
        .iter()
        .all(|r| r.status == Status::Draft && r.gross_salary == r.basic_salary));
}

#[tokio::test]
async fn bulk_generation_skips_inactive_employees() {
    let db = common::setup().await;
    use entity::employee::Status as EmpStatus;
    use hrm::employees::{self, UpdateEmployee};

    common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let gone = common::insert_employee(&db, "Bob", "bob@example.com", "EMP-0002", 80_000.0).await;
    employees::update(
        &db,
        gone.id,
        UpdateEmployee {
            status: Some(EmpStatus::Terminated),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let summary = payroll::bulk_generate(&db, 6, 2024).await.unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.total, 1);
}

#[tokio::test]
async fn dashboard_totals_paid_net_salary() {
    let db = common::setup().await;
    let emp = common::insert_employee(&db, "Ada", "ada@example.com", "EMP-0001", 90_000.0).await;
    let record = payroll::create(&db, basic_record(emp.id, 7, 2024)).await.unwrap();
    payroll::process(&db, record.id).await.unwrap();
    payroll::mark_paid(&db, record.id).await.unwrap();
    payroll::create(&db, basic_record(emp.id, 8, 2024)).await.unwrap();

    let dashboard = payroll::dashboard(&db).await.unwrap();
    assert_eq!(dashboard.total, 2);
    assert_eq!(dashboard.draft, 1);
    assert_eq!(dashboard.paid, 1);
    assert_eq!(dashboard.net_total_paid, 50_500.0);
}
