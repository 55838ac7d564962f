use entity::employee::Department;
use hrm::employees::{self, NewEmployee};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

const SCHEMA: &[&str] = &[
    "CREATE TABLE employee (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        employee_code TEXT NOT NULL,
        department TEXT NOT NULL,
        position TEXT NOT NULL,
        salary REAL NOT NULL,
        join_date TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        status TEXT NOT NULL,
        manager_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
    "CREATE UNIQUE INDEX uq_employee_email ON employee (email);",
    "CREATE UNIQUE INDEX uq_employee_code ON employee (employee_code);",
    "CREATE TABLE leave (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL,
        employee_name TEXT NOT NULL,
        leave_type TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        total_days INTEGER NOT NULL,
        reason TEXT NOT NULL,
        status TEXT NOT NULL,
        approved_by TEXT,
        approved_date TEXT,
        comments TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
    "CREATE TABLE payroll (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL,
        employee_name TEXT NOT NULL,
        period_month INTEGER NOT NULL,
        period_year INTEGER NOT NULL,
        basic_salary REAL NOT NULL,
        allowance_hra REAL NOT NULL,
        allowance_transport REAL NOT NULL,
        allowance_medical REAL NOT NULL,
        allowance_other REAL NOT NULL,
        overtime_hours REAL NOT NULL,
        overtime_rate REAL NOT NULL,
        overtime_amount REAL NOT NULL,
        deduction_tax REAL NOT NULL,
        deduction_pf REAL NOT NULL,
        deduction_insurance REAL NOT NULL,
        deduction_other REAL NOT NULL,
        gross_salary REAL NOT NULL,
        total_deductions REAL NOT NULL,
        net_salary REAL NOT NULL,
        status TEXT NOT NULL,
        processed_date TEXT,
        payment_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
    "CREATE UNIQUE INDEX uq_payroll_period ON payroll (employee_id, period_month, period_year);",
    "CREATE TABLE offer_letter (
        id TEXT PRIMARY KEY,
        candidate_name TEXT NOT NULL,
        candidate_email TEXT NOT NULL,
        position TEXT NOT NULL,
        department TEXT NOT NULL,
        salary REAL NOT NULL,
        currency TEXT NOT NULL,
        start_date TEXT NOT NULL,
        reporting_manager TEXT NOT NULL,
        work_location TEXT NOT NULL,
        employment_type TEXT NOT NULL,
        benefits TEXT NOT NULL,
        probation_period_days INTEGER NOT NULL,
        notice_period_days INTEGER NOT NULL,
        offer_valid_until TEXT NOT NULL,
        status TEXT NOT NULL,
        sent_date TEXT,
        response_date TEXT,
        hr_contact_name TEXT NOT NULL,
        hr_contact_email TEXT NOT NULL,
        hr_contact_phone TEXT NOT NULL,
        additional_notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
    "CREATE UNIQUE INDEX uq_offer_active_candidate ON offer_letter (candidate_email)
        WHERE status IN ('DRAFT', 'SENT', 'ACCEPTED');",
    "CREATE TABLE recruitment (
        id TEXT PRIMARY KEY,
        job_title TEXT NOT NULL,
        department TEXT NOT NULL,
        job_description TEXT NOT NULL,
        requirements TEXT NOT NULL,
        location TEXT NOT NULL,
        employment_type TEXT NOT NULL,
        experience_level TEXT NOT NULL,
        salary_min REAL NOT NULL,
        salary_max REAL NOT NULL,
        status TEXT NOT NULL,
        posted_date TEXT NOT NULL,
        closing_date TEXT NOT NULL,
        applicants_count INTEGER NOT NULL,
        hiring_manager_id TEXT NOT NULL,
        skills TEXT NOT NULL,
        benefits TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
    "CREATE TABLE review (
        id TEXT PRIMARY KEY,
        employee_id TEXT NOT NULL,
        employee_name TEXT NOT NULL,
        reviewer_id TEXT NOT NULL,
        reviewer_name TEXT NOT NULL,
        period_start TEXT NOT NULL,
        period_end TEXT NOT NULL,
        review_type TEXT NOT NULL,
        overall_rating REAL NOT NULL,
        performance_rating INTEGER NOT NULL,
        performance_comments TEXT,
        communication_rating INTEGER NOT NULL,
        communication_comments TEXT,
        teamwork_rating INTEGER NOT NULL,
        teamwork_comments TEXT,
        leadership_rating INTEGER NOT NULL,
        leadership_comments TEXT,
        problem_solving_rating INTEGER NOT NULL,
        problem_solving_comments TEXT,
        strengths TEXT NOT NULL,
        areas_for_improvement TEXT NOT NULL,
        goals TEXT NOT NULL,
        feedback TEXT NOT NULL,
        employee_comments TEXT,
        status TEXT NOT NULL,
        completed_date TEXT,
        acknowledged_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
];

/// Fresh in-memory database with the full schema applied. A single pooled
/// connection keeps every statement on the same in-memory database.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("sqlite in-memory connection");
    for statement in SCHEMA {
        db.execute_unprepared(statement)
            .await
            .expect("schema bootstrap");
    }
    db
}

/// Inserts an active engineering employee through the ordinary write path.
pub async fn insert_employee(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    code: &str,
    salary: f64,
) -> entity::employee::Model {
    employees::create(
        db,
        NewEmployee {
            name: name.into(),
            email: email.into(),
            employee_code: code.into(),
            department: Department::Engineering,
            position: "Software Engineer".into(),
            salary,
            join_date: None,
            phone: None,
            address: None,
            status: None,
            manager_id: None,
        },
    )
    .await
    .expect("employee insert")
}
