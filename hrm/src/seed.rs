//! Demo dataset for local development and smoke testing.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use entity::employee::Department;
use entity::leave::LeaveType;
use entity::recruitment::{EmploymentType, ExperienceLevel};
use entity::review::ReviewType;
use entity::{employee, leave, offer_letter, payroll, recruitment, review};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::HrmResult;
use crate::reviews::CategoryScore;
use crate::{employees, leave as leave_ops, offers, payroll as payroll_ops, recruitment as recruitment_ops, reviews};

pub struct SeededHrmRecords {
    pub employees: Vec<employee::Model>,
    pub leave: leave::Model,
    pub payroll: payroll::Model,
    pub offer: offer_letter::Model,
    pub posting: recruitment::Model,
    pub review: review::Model,
}

impl SeededHrmRecords {
    pub fn employee_coded(&self, code: &str) -> Option<&employee::Model> {
        self.employees.iter().find(|e| e.employee_code == code)
    }
}

/// Seeds a small, internally consistent HR dataset. Every record goes
/// through the ordinary write paths so derived fields and lifecycle
/// stamps are filled in the same way real traffic fills them.
pub async fn seed_hr_demo(db: &DatabaseConnection) -> HrmResult<SeededHrmRecords> {
    let head = employees::create(
        db,
        new_employee(
            "Priya Nair",
            "priya.nair@hrm.test",
            "EMP-0001",
            Department::Engineering,
            "Engineering Manager",
            120_000.0,
            None,
        ),
    )
    .await?;
    let dev = employees::create(
        db,
        new_employee(
            "Marco Silva",
            "marco.silva@hrm.test",
            "EMP-0002",
            Department::Engineering,
            "Software Engineer",
            90_000.0,
            Some(head.id),
        ),
    )
    .await?;
    let hr_lead = employees::create(
        db,
        new_employee(
            "Dana Wells",
            "dana.wells@hrm.test",
            "EMP-0003",
            Department::Hr,
            "HR Lead",
            80_000.0,
            None,
        ),
    )
    .await?;
    let seller = employees::create(
        db,
        new_employee(
            "Tom Okafor",
            "tom.okafor@hrm.test",
            "EMP-0004",
            Department::Sales,
            "Account Executive",
            75_000.0,
            None,
        ),
    )
    .await?;
    let analyst = employees::create(
        db,
        new_employee(
            "Ines Laurent",
            "ines.laurent@hrm.test",
            "EMP-0005",
            Department::Finance,
            "Financial Analyst",
            70_000.0,
            None,
        ),
    )
    .await?;

    let today = Utc::now().date_naive();
    let leave = leave_ops::create(
        db,
        leave_ops::NewLeave {
            employee_id: dev.id,
            leave_type: LeaveType::Vacation,
            start_date: today + Duration::days(14),
            end_date: today + Duration::days(18),
            reason: "Family visit".into(),
        },
    )
    .await?;
    let leave = leave_ops::approve(db, leave.id, head.id, Some("Enjoy".into())).await?;

    let payroll = payroll_ops::create(
        db,
        payroll_ops::NewPayroll {
            employee_id: dev.id,
            period_month: today.month() as i16,
            period_year: today.year(),
            basic_salary: dev.salary / 12.0,
            allowance_hra: 500.0,
            allowance_transport: 120.0,
            allowance_medical: 80.0,
            allowance_other: 0.0,
            overtime_hours: 4.0,
            overtime_rate: 45.0,
            deduction_tax: 1200.0,
            deduction_pf: 300.0,
            deduction_insurance: 150.0,
            deduction_other: 0.0,
        },
    )
    .await?;

    let offer = offers::create(
        db,
        offers::NewOffer {
            candidate_name: "Riley Chen".into(),
            candidate_email: "riley.chen@example.test".into(),
            position: "Senior Software Engineer".into(),
            department: Department::Engineering,
            salary: 110_000.0,
            currency: None,
            start_date: today + Duration::days(30),
            reporting_manager: head.name.clone(),
            work_location: "Remote".into(),
            employment_type: EmploymentType::FullTime,
            benefits: None,
            probation_period_days: None,
            notice_period_days: None,
            offer_valid_until: Utc::now() + Duration::days(14),
            hr_contact_name: hr_lead.name.clone(),
            hr_contact_email: hr_lead.email.clone(),
            hr_contact_phone: "+1-555-0142".into(),
            additional_notes: None,
        },
    )
    .await?;
    let offer = offers::send(db, offer.id).await?;

    let posting = recruitment_ops::create(
        db,
        recruitment_ops::NewJobPosting {
            job_title: "Backend Engineer".into(),
            department: Department::Engineering,
            job_description: "Own services end to end, from design to operations.".into(),
            requirements: vec![
                "3+ years building backend services".into(),
                "Production database experience".into(),
            ],
            location: "Remote".into(),
            employment_type: EmploymentType::FullTime,
            experience_level: ExperienceLevel::Mid,
            salary_min: 85_000.0,
            salary_max: 115_000.0,
            posted_date: None,
            closing_date: today + Duration::days(45),
            hiring_manager_id: head.id,
            skills: vec!["SQL".into(), "API design".into()],
            benefits: None,
        },
    )
    .await?;

    let review = reviews::create(
        db,
        reviews::NewReview {
            employee_id: dev.id,
            reviewer_id: head.id,
            period_start: today - Duration::days(365),
            period_end: today - Duration::days(1),
            review_type: ReviewType::Annual,
            performance: score(4, Some("Consistently ships on time")),
            communication: score(5, None),
            teamwork: score(3, Some("Could pair more with juniors")),
            leadership: score(4, None),
            problem_solving: score(5, None),
            strengths: vec!["Reliable delivery".into(), "Clear written updates".into()],
            areas_for_improvement: vec!["Mentoring".into()],
            goals: vec!["Lead one project next half".into()],
            feedback: "Strong year overall; ready for more ownership.".into(),
        },
    )
    .await?;
    let review = reviews::complete(db, review.id).await?;

    info!("demo HR dataset seeded");
    Ok(SeededHrmRecords {
        employees: vec![head, dev, hr_lead, seller, analyst],
        leave,
        payroll,
        offer,
        posting,
        review,
    })
}

fn new_employee(
    name: &str,
    email: &str,
    code: &str,
    department: Department,
    position: &str,
    salary: f64,
    manager_id: Option<uuid::Uuid>,
) -> employees::NewEmployee {
    employees::NewEmployee {
        name: name.into(),
        email: email.into(),
        employee_code: code.into(),
        department,
        position: position.into(),
        salary,
        join_date: NaiveDate::from_ymd_opt(2023, 3, 1),
        phone: None,
        address: None,
        status: None,
        manager_id,
    }
}

fn score(rating: i16, comments: Option<&str>) -> CategoryScore {
    CategoryScore {
        rating,
        comments: comments.map(str::to_owned),
    }
}
