//! Payroll write paths: derived salary fields, period uniqueness, the
//! processing flow and idempotent bulk generation.

use chrono::Utc;
use entity::{
    employee,
    payroll::{self, Status},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::employees::require_employee;
use crate::error::{HrmError, HrmResult};
use crate::rules::{self, PayrollInputs};
use crate::validate;

#[derive(Clone, Debug, Deserialize)]
pub struct NewPayroll {
    pub employee_id: Uuid,
    pub period_month: i16,
    pub period_year: i32,
    pub basic_salary: f64,
    #[serde(default)]
    pub allowance_hra: f64,
    #[serde(default)]
    pub allowance_transport: f64,
    #[serde(default)]
    pub allowance_medical: f64,
    #[serde(default)]
    pub allowance_other: f64,
    #[serde(default)]
    pub overtime_hours: f64,
    #[serde(default)]
    pub overtime_rate: f64,
    #[serde(default)]
    pub deduction_tax: f64,
    #[serde(default)]
    pub deduction_pf: f64,
    #[serde(default)]
    pub deduction_insurance: f64,
    #[serde(default)]
    pub deduction_other: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdatePayroll {
    pub basic_salary: Option<f64>,
    pub allowance_hra: Option<f64>,
    pub allowance_transport: Option<f64>,
    pub allowance_medical: Option<f64>,
    pub allowance_other: Option<f64>,
    pub overtime_hours: Option<f64>,
    pub overtime_rate: Option<f64>,
    pub deduction_tax: Option<f64>,
    pub deduction_pf: Option<f64>,
    pub deduction_insurance: Option<f64>,
    pub deduction_other: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PayrollFilter {
    pub employee_id: Option<Uuid>,
    pub period_month: Option<i16>,
    pub period_year: Option<i32>,
    pub status: Option<Status>,
}

/// Outcome of a bulk generation run. `created` reflects idempotence:
/// a re-run over the same period reports zero.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct BulkGenerationSummary {
    pub created: u64,
    pub total: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PayrollDashboard {
    pub total: u64,
    pub draft: u64,
    pub processed: u64,
    pub paid: u64,
    pub net_total_paid: f64,
}

pub async fn create(db: &DatabaseConnection, input: NewPayroll) -> HrmResult<payroll::Model> {
    validate::pay_period(input.period_month, input.period_year)?;
    let employee = require_employee(db, input.employee_id, "employee").await?;
    let inputs = payroll_inputs(&input)?;

    // Friendly pre-check; the unique index on (employee, month, year) is
    // what actually guarantees one record per period.
    if find_period(db, input.employee_id, input.period_month, input.period_year)
        .await?
        .is_some()
    {
        return Err(HrmError::Conflict {
            field: "pay_period",
        });
    }

    let model = insert_record(
        db,
        &employee,
        input.period_month,
        input.period_year,
        &inputs,
    )
    .await?;
    info!(payroll = %model.id, employee = %model.employee_id,
        month = model.period_month, year = model.period_year, "payroll record created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdatePayroll,
) -> HrmResult<payroll::Model> {
    let existing = require_payroll(db, id).await?;
    let inputs = PayrollInputs {
        basic_salary: validate::non_negative(
            "basic salary",
            input.basic_salary.unwrap_or(existing.basic_salary),
        )?,
        allowance_hra: input.allowance_hra.unwrap_or(existing.allowance_hra),
        allowance_transport: input
            .allowance_transport
            .unwrap_or(existing.allowance_transport),
        allowance_medical: input.allowance_medical.unwrap_or(existing.allowance_medical),
        allowance_other: input.allowance_other.unwrap_or(existing.allowance_other),
        overtime_hours: validate::non_negative(
            "overtime hours",
            input.overtime_hours.unwrap_or(existing.overtime_hours),
        )?,
        overtime_rate: validate::non_negative(
            "overtime rate",
            input.overtime_rate.unwrap_or(existing.overtime_rate),
        )?,
        deduction_tax: input.deduction_tax.unwrap_or(existing.deduction_tax),
        deduction_pf: input.deduction_pf.unwrap_or(existing.deduction_pf),
        deduction_insurance: input
            .deduction_insurance
            .unwrap_or(existing.deduction_insurance),
        deduction_other: input.deduction_other.unwrap_or(existing.deduction_other),
    };
    // Derived fields are always recomputed; stored values never survive
    // an update.
    let totals = rules::compute_payroll(&inputs);

    let mut model = existing.into_active_model();
    model.basic_salary = Set(inputs.basic_salary);
    model.allowance_hra = Set(inputs.allowance_hra);
    model.allowance_transport = Set(inputs.allowance_transport);
    model.allowance_medical = Set(inputs.allowance_medical);
    model.allowance_other = Set(inputs.allowance_other);
    model.overtime_hours = Set(inputs.overtime_hours);
    model.overtime_rate = Set(inputs.overtime_rate);
    model.overtime_amount = Set(totals.overtime_amount);
    model.deduction_tax = Set(inputs.deduction_tax);
    model.deduction_pf = Set(inputs.deduction_pf);
    model.deduction_insurance = Set(inputs.deduction_insurance);
    model.deduction_other = Set(inputs.deduction_other);
    model.gross_salary = Set(totals.gross_salary);
    model.total_deductions = Set(totals.total_deductions);
    model.net_salary = Set(totals.net_salary);
    model.updated_at = Set(Utc::now().into());
    Ok(model.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> HrmResult<payroll::Model> {
    require_payroll(db, id).await
}

pub async fn list(
    db: &DatabaseConnection,
    filter: PayrollFilter,
    first: Option<i32>,
    offset: Option<i32>,
) -> HrmResult<Vec<payroll::Model>> {
    let (limit, skip) = validate::page_window(first, offset);
    let mut query = payroll::Entity::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(payroll::Column::EmployeeId.eq(employee_id));
    }
    if let Some(month) = filter.period_month {
        query = query.filter(payroll::Column::PeriodMonth.eq(month));
    }
    if let Some(year) = filter.period_year {
        query = query.filter(payroll::Column::PeriodYear.eq(year));
    }
    if let Some(status) = filter.status {
        query = query.filter(payroll::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(payroll::Column::PeriodYear)
        .order_by_desc(payroll::Column::PeriodMonth)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?)
}

/// Draft -> Processed, stamping the processing time.
pub async fn process(db: &DatabaseConnection, id: Uuid) -> HrmResult<payroll::Model> {
    let existing = require_payroll(db, id).await?;
    if existing.status != Status::Draft {
        return Err(HrmError::validation("Only draft payroll can be processed"));
    }
    let mut model = existing.into_active_model();
    let now = Utc::now();
    model.status = Set(Status::Processed);
    model.processed_date = Set(Some(now.into()));
    model.updated_at = Set(now.into());
    let model = model.update(db).await?;
    info!(payroll = %model.id, "payroll processed");
    Ok(model)
}

/// Processed -> Paid, stamping the payment time.
pub async fn mark_paid(db: &DatabaseConnection, id: Uuid) -> HrmResult<payroll::Model> {
    let existing = require_payroll(db, id).await?;
    if existing.status != Status::Processed {
        return Err(HrmError::validation(
            "Only processed payroll can be marked paid",
        ));
    }
    let mut model = existing.into_active_model();
    let now = Utc::now();
    model.status = Set(Status::Paid);
    model.payment_date = Set(Some(now.into()));
    model.updated_at = Set(now.into());
    let model = model.update(db).await?;
    info!(payroll = %model.id, "payroll marked paid");
    Ok(model)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> HrmResult<()> {
    let result = payroll::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmError::NotFound {
            entity: "payroll record",
        });
    }
    Ok(())
}

/// Creates one Draft record per active employee for the period, skipping
/// employees that already have one. Safe to re-run: a concurrent insert
/// losing the race against the period index is treated as already
/// existing, not as a failure.
pub async fn bulk_generate(
    db: &DatabaseConnection,
    month: i16,
    year: i32,
) -> HrmResult<BulkGenerationSummary> {
    validate::pay_period(month, year)?;
    let span = info_span!("payroll.bulk_generate", month, year);
    async {
        let employees = employee::Entity::find()
            .filter(employee::Column::Status.eq(employee::Status::Active))
            .all(db)
            .await?;
        let total = employees.len() as u64;
        let mut created = 0u64;

        for emp in employees {
            if find_period(db, emp.id, month, year).await?.is_some() {
                continue;
            }
            let inputs = PayrollInputs {
                basic_salary: emp.salary,
                ..Default::default()
            };
            match insert_record(db, &emp, month, year, &inputs).await {
                Ok(_) => created += 1,
                Err(err) if err.is_conflict() => {
                    debug!(employee = %emp.id, "payroll already exists, skipping");
                }
                Err(err) => return Err(err),
            }
        }

        info!(created, total, "bulk payroll generation finished");
        Ok(BulkGenerationSummary { created, total })
    }
    .instrument(span)
    .await
}

pub async fn dashboard(db: &DatabaseConnection) -> HrmResult<PayrollDashboard> {
    let total = payroll::Entity::find().count(db).await?;
    let draft = count_status(db, Status::Draft).await?;
    let processed = count_status(db, Status::Processed).await?;
    let paid = count_status(db, Status::Paid).await?;

    #[derive(FromQueryResult)]
    struct NetRow {
        net: Option<f64>,
    }
    let row = payroll::Entity::find()
        .select_only()
        .column_as(payroll::Column::NetSalary.sum(), "net")
        .filter(payroll::Column::Status.eq(Status::Paid))
        .into_model::<NetRow>()
        .one(db)
        .await?;
    let net_total_paid = row.and_then(|r| r.net).unwrap_or(0.0);

    Ok(PayrollDashboard {
        total,
        draft,
        processed,
        paid,
        net_total_paid,
    })
}

async fn count_status(db: &DatabaseConnection, status: Status) -> HrmResult<u64> {
    Ok(payroll::Entity::find()
        .filter(payroll::Column::Status.eq(status))
        .count(db)
        .await?)
}

fn payroll_inputs(input: &NewPayroll) -> HrmResult<PayrollInputs> {
    Ok(PayrollInputs {
        basic_salary: validate::non_negative("basic salary", input.basic_salary)?,
        allowance_hra: input.allowance_hra,
        allowance_transport: input.allowance_transport,
        allowance_medical: input.allowance_medical,
        allowance_other: input.allowance_other,
        overtime_hours: validate::non_negative("overtime hours", input.overtime_hours)?,
        overtime_rate: validate::non_negative("overtime rate", input.overtime_rate)?,
        deduction_tax: input.deduction_tax,
        deduction_pf: input.deduction_pf,
        deduction_insurance: input.deduction_insurance,
        deduction_other: input.deduction_other,
    })
}

async fn insert_record(
    db: &DatabaseConnection,
    employee: &employee::Model,
    month: i16,
    year: i32,
    inputs: &PayrollInputs,
) -> HrmResult<payroll::Model> {
    let totals = rules::compute_payroll(inputs);
    let now = Utc::now();
    Ok(payroll::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        employee_name: Set(employee.name.clone()),
        period_month: Set(month),
        period_year: Set(year),
        basic_salary: Set(inputs.basic_salary),
        allowance_hra: Set(inputs.allowance_hra),
        allowance_transport: Set(inputs.allowance_transport),
        allowance_medical: Set(inputs.allowance_medical),
        allowance_other: Set(inputs.allowance_other),
        overtime_hours: Set(inputs.overtime_hours),
        overtime_rate: Set(inputs.overtime_rate),
        overtime_amount: Set(totals.overtime_amount),
        deduction_tax: Set(inputs.deduction_tax),
        deduction_pf: Set(inputs.deduction_pf),
        deduction_insurance: Set(inputs.deduction_insurance),
        deduction_other: Set(inputs.deduction_other),
        gross_salary: Set(totals.gross_salary),
        total_deductions: Set(totals.total_deductions),
        net_salary: Set(totals.net_salary),
        status: Set(Status::Draft),
        processed_date: Set(None),
        payment_date: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?)
}

async fn find_period(
    db: &DatabaseConnection,
    employee_id: Uuid,
    month: i16,
    year: i32,
) -> HrmResult<Option<payroll::Model>> {
    Ok(payroll::Entity::find()
        .filter(payroll::Column::EmployeeId.eq(employee_id))
        .filter(payroll::Column::PeriodMonth.eq(month))
        .filter(payroll::Column::PeriodYear.eq(year))
        .one(db)
        .await?)
}

async fn require_payroll(db: &DatabaseConnection, id: Uuid) -> HrmResult<payroll::Model> {
    payroll::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrmError::NotFound {
            entity: "payroll record",
        })
}
