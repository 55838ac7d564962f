//! Offer letter write paths and status lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use entity::employee::Department;
use entity::offer_letter::{self, Currency, Status};
use entity::recruitment::EmploymentType;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::employees::DepartmentCount;
use crate::error::{HrmError, HrmResult};
use crate::rules::{self, OfferState};
use crate::validate;

const DEFAULT_PROBATION_DAYS: i32 = 90;
const DEFAULT_NOTICE_DAYS: i32 = 30;

const STANDARD_BENEFITS: [&str; 6] = [
    "Health Insurance",
    "Dental Insurance",
    "Vision Insurance",
    "Retirement Plan",
    "Paid Time Off",
    "Professional Development",
];

#[derive(Clone, Debug, Deserialize)]
pub struct NewOffer {
    pub candidate_name: String,
    pub candidate_email: String,
    pub position: String,
    pub department: Department,
    pub salary: f64,
    pub currency: Option<Currency>,
    pub start_date: NaiveDate,
    pub reporting_manager: String,
    pub work_location: String,
    pub employment_type: EmploymentType,
    pub benefits: Option<Vec<String>>,
    pub probation_period_days: Option<i32>,
    pub notice_period_days: Option<i32>,
    pub offer_valid_until: DateTime<Utc>,
    pub hr_contact_name: String,
    pub hr_contact_email: String,
    pub hr_contact_phone: String,
    pub additional_notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateOffer {
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub currency: Option<Currency>,
    pub start_date: Option<NaiveDate>,
    pub reporting_manager: Option<String>,
    pub work_location: Option<String>,
    pub benefits: Option<Vec<String>>,
    pub probation_period_days: Option<i32>,
    pub notice_period_days: Option<i32>,
    pub offer_valid_until: Option<DateTime<Utc>>,
    pub additional_notes: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OfferDashboard {
    pub total: u64,
    pub draft: u64,
    pub sent: u64,
    pub accepted: u64,
    pub declined: u64,
    pub expired: u64,
    pub by_department: Vec<DepartmentCount>,
    /// Mean salary across Sent and Accepted offers.
    pub average_salary: f64,
    /// Accepted offers as a percentage of all offers, two decimals.
    pub acceptance_rate: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OfferFilter {
    pub status: Option<Status>,
    pub department: Option<Department>,
    /// Case-insensitive substring match over candidate name and email.
    pub q: Option<String>,
}

pub async fn create(db: &DatabaseConnection, input: NewOffer) -> HrmResult<offer_letter::Model> {
    let candidate_name = validate::require_text("candidate name", &input.candidate_name, 100)?;
    let candidate_email = validate::normalize_email("candidate email", &input.candidate_email)?;
    let position = validate::require_text("position", &input.position, 100)?;
    let salary = validate::non_negative("salary", input.salary)?;
    let reporting_manager =
        validate::require_text("reporting manager", &input.reporting_manager, 100)?;
    let work_location = validate::require_text("work location", &input.work_location, 256)?;
    let probation = validate::non_negative_days(
        "probation period",
        input.probation_period_days.unwrap_or(DEFAULT_PROBATION_DAYS),
    )?;
    let notice = validate::non_negative_days(
        "notice period",
        input.notice_period_days.unwrap_or(DEFAULT_NOTICE_DAYS),
    )?;
    let hr_contact_name = validate::require_text("HR contact name", &input.hr_contact_name, 100)?;
    let hr_contact_email =
        validate::normalize_email("HR contact email", &input.hr_contact_email)?;
    let hr_contact_phone =
        validate::require_text("HR contact phone", &input.hr_contact_phone, 32)?;
    let additional_notes =
        validate::optional_text("additional notes", input.additional_notes, 1000)?;
    let benefits = validate::string_list(
        input
            .benefits
            .unwrap_or_else(|| STANDARD_BENEFITS.iter().map(|b| b.to_string()).collect()),
    );

    ensure_no_active_offer(db, &candidate_email).await?;

    // New offers pass through the lifecycle rule like every other save,
    // even though a Draft never transitions here.
    let now = Utc::now();
    let mut state = OfferState {
        status: Status::Draft,
        offer_valid_until: input.offer_valid_until.into(),
        sent_date: None,
        response_date: None,
    };
    rules::apply_offer_lifecycle(&mut state, now.into());

    let model = offer_letter::ActiveModel {
        id: Set(Uuid::new_v4()),
        candidate_name: Set(candidate_name),
        candidate_email: Set(candidate_email),
        position: Set(position),
        department: Set(input.department),
        salary: Set(salary),
        currency: Set(input.currency.unwrap_or(Currency::Usd)),
        start_date: Set(input.start_date),
        reporting_manager: Set(reporting_manager),
        work_location: Set(work_location),
        employment_type: Set(input.employment_type),
        benefits: Set(benefits),
        probation_period_days: Set(probation),
        notice_period_days: Set(notice),
        offer_valid_until: Set(state.offer_valid_until),
        status: Set(state.status),
        sent_date: Set(state.sent_date),
        response_date: Set(state.response_date),
        hr_contact_name: Set(hr_contact_name),
        hr_contact_email: Set(hr_contact_email),
        hr_contact_phone: Set(hr_contact_phone),
        additional_notes: Set(additional_notes),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(offer = %model.id, candidate = %model.candidate_email, "offer letter created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateOffer,
) -> HrmResult<offer_letter::Model> {
    let existing = require_offer(db, id).await?;
    let mut state = offer_state(&existing);
    let mut model = existing.into_active_model();

    if let Some(position) = input.position {
        model.position = Set(validate::require_text("position", &position, 100)?);
    }
    if let Some(salary) = input.salary {
        model.salary = Set(validate::non_negative("salary", salary)?);
    }
    if let Some(currency) = input.currency {
        model.currency = Set(currency);
    }
    if let Some(start_date) = input.start_date {
        model.start_date = Set(start_date);
    }
    if let Some(manager) = input.reporting_manager {
        model.reporting_manager = Set(validate::require_text("reporting manager", &manager, 100)?);
    }
    if let Some(location) = input.work_location {
        model.work_location = Set(validate::require_text("work location", &location, 256)?);
    }
    if let Some(benefits) = input.benefits {
        model.benefits = Set(validate::require_list("benefits", benefits)?);
    }
    if let Some(probation) = input.probation_period_days {
        model.probation_period_days =
            Set(validate::non_negative_days("probation period", probation)?);
    }
    if let Some(notice) = input.notice_period_days {
        model.notice_period_days = Set(validate::non_negative_days("notice period", notice)?);
    }
    if let Some(notes) = input.additional_notes {
        model.additional_notes =
            Set(validate::optional_text("additional notes", Some(notes), 1000)?);
    }
    if let Some(valid_until) = input.offer_valid_until {
        state.offer_valid_until = valid_until.into();
    }

    let now = Utc::now();
    rules::apply_offer_lifecycle(&mut state, now.into());
    apply_state(&mut model, &state);
    model.updated_at = Set(now.into());
    Ok(model.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> HrmResult<offer_letter::Model> {
    require_offer(db, id).await
}

pub async fn list(
    db: &DatabaseConnection,
    filter: OfferFilter,
    first: Option<i32>,
    offset: Option<i32>,
) -> HrmResult<Vec<offer_letter::Model>> {
    let (limit, skip) = validate::page_window(first, offset);
    let mut query = offer_letter::Entity::find();
    if let Some(status) = filter.status {
        query = query.filter(offer_letter::Column::Status.eq(status));
    }
    if let Some(department) = filter.department {
        query = query.filter(offer_letter::Column::Department.eq(department));
    }
    if let Some(q) = filter.q {
        let trimmed = q.trim().to_lowercase();
        if !trimmed.is_empty() {
            let pattern = format!("%{}%", trimmed);
            let name_expr =
                Expr::expr(Func::lower(Expr::col(offer_letter::Column::CandidateName)));
            let email_expr =
                Expr::expr(Func::lower(Expr::col(offer_letter::Column::CandidateEmail)));
            query = query.filter(
                Condition::any()
                    .add(name_expr.like(pattern.clone()))
                    .add(email_expr.like(pattern)),
            );
        }
    }
    Ok(query
        .order_by_desc(offer_letter::Column::CreatedAt)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?)
}

/// Draft -> Sent. The lifecycle rule stamps the sent date; an offer whose
/// validity already passed expires on the same save instead.
pub async fn send(db: &DatabaseConnection, id: Uuid) -> HrmResult<offer_letter::Model> {
    let existing = require_offer(db, id).await?;
    if existing.status != Status::Draft {
        return Err(HrmError::validation("Only draft offers can be sent"));
    }
    let mut state = offer_state(&existing);
    state.status = Status::Sent;
    save_with_lifecycle(db, existing, state).await
}

/// Sent -> Accepted. Expiry wins: an overdue offer expires instead of
/// accepting.
pub async fn accept(db: &DatabaseConnection, id: Uuid) -> HrmResult<offer_letter::Model> {
    respond(db, id, Status::Accepted).await
}

/// Sent -> Declined.
pub async fn decline(db: &DatabaseConnection, id: Uuid) -> HrmResult<offer_letter::Model> {
    respond(db, id, Status::Declined).await
}

async fn respond(
    db: &DatabaseConnection,
    id: Uuid,
    response: Status,
) -> HrmResult<offer_letter::Model> {
    let existing = require_offer(db, id).await?;
    if existing.status != Status::Sent {
        return Err(HrmError::validation(
            "Only sent offers can be accepted or declined",
        ));
    }
    let mut state = offer_state(&existing);
    // Apply expiry first; a response to an overdue offer is invalid.
    rules::apply_offer_lifecycle(&mut state, Utc::now().into());
    if state.status == Status::Expired {
        let model = save_with_lifecycle(db, existing, state).await?;
        info!(offer = %model.id, "offer expired before response");
        return Err(HrmError::validation("Offer has expired"));
    }
    state.status = response;
    save_with_lifecycle(db, existing, state).await
}

/// Flips every Sent offer whose validity has passed to Expired and
/// returns how many were flipped.
pub async fn expire_overdue(db: &DatabaseConnection) -> HrmResult<u64> {
    let now = Utc::now();
    let overdue = offer_letter::Entity::find()
        .filter(offer_letter::Column::Status.eq(Status::Sent))
        .filter(offer_letter::Column::OfferValidUntil.lt(now))
        .all(db)
        .await?;
    let mut expired = 0u64;
    for offer in overdue {
        let mut state = offer_state(&offer);
        rules::apply_offer_lifecycle(&mut state, now.into());
        if state.status == Status::Expired {
            save_with_lifecycle(db, offer, state).await?;
            expired += 1;
        }
    }
    if expired > 0 {
        info!(expired, "overdue offers expired");
    }
    Ok(expired)
}

pub async fn dashboard(db: &DatabaseConnection) -> HrmResult<OfferDashboard> {
    let total = offer_letter::Entity::find().count(db).await?;
    let draft = count_status(db, Status::Draft).await?;
    let sent = count_status(db, Status::Sent).await?;
    let accepted = count_status(db, Status::Accepted).await?;
    let declined = count_status(db, Status::Declined).await?;
    let expired = count_status(db, Status::Expired).await?;

    let by_department = offer_letter::Entity::find()
        .select_only()
        .column(offer_letter::Column::Department)
        .column_as(offer_letter::Column::Id.count(), "count")
        .group_by(offer_letter::Column::Department)
        .into_model::<DepartmentCount>()
        .all(db)
        .await?;

    // Draft salaries are still negotiable; the average covers offers
    // actually put in front of candidates.
    let outstanding = sent + accepted;
    let average_salary = if outstanding == 0 {
        0.0
    } else {
        #[derive(FromQueryResult)]
        struct SalaryRow {
            total: Option<f64>,
        }
        let row = offer_letter::Entity::find()
            .select_only()
            .column_as(offer_letter::Column::Salary.sum(), "total")
            .filter(offer_letter::Column::Status.is_in([Status::Sent, Status::Accepted]))
            .into_model::<SalaryRow>()
            .one(db)
            .await?;
        row.and_then(|r| r.total).unwrap_or(0.0) / outstanding as f64
    };

    let acceptance_rate = if total == 0 {
        0.0
    } else {
        (accepted as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
    };

    Ok(OfferDashboard {
        total,
        draft,
        sent,
        accepted,
        declined,
        expired,
        by_department,
        average_salary,
        acceptance_rate,
    })
}

async fn count_status(db: &DatabaseConnection, status: Status) -> HrmResult<u64> {
    Ok(offer_letter::Entity::find()
        .filter(offer_letter::Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> HrmResult<()> {
    let result = offer_letter::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmError::NotFound {
            entity: "offer letter",
        });
    }
    Ok(())
}

/// A Draft/Sent/Accepted offer blocks a second offer for the candidate.
/// The partial unique index on candidate_email is the backstop.
async fn ensure_no_active_offer(db: &DatabaseConnection, candidate_email: &str) -> HrmResult<()> {
    let active = offer_letter::Entity::find()
        .filter(offer_letter::Column::CandidateEmail.eq(candidate_email))
        .filter(offer_letter::Column::Status.is_in([
            Status::Draft,
            Status::Sent,
            Status::Accepted,
        ]))
        .one(db)
        .await?;
    if active.is_some() {
        return Err(HrmError::Conflict {
            field: "candidate_email",
        });
    }
    Ok(())
}

fn offer_state(model: &offer_letter::Model) -> OfferState {
    OfferState {
        status: model.status,
        offer_valid_until: model.offer_valid_until,
        sent_date: model.sent_date,
        response_date: model.response_date,
    }
}

fn apply_state(model: &mut offer_letter::ActiveModel, state: &OfferState) {
    model.status = Set(state.status);
    model.offer_valid_until = Set(state.offer_valid_until);
    model.sent_date = Set(state.sent_date);
    model.response_date = Set(state.response_date);
}

async fn save_with_lifecycle(
    db: &DatabaseConnection,
    existing: offer_letter::Model,
    mut state: OfferState,
) -> HrmResult<offer_letter::Model> {
    let now = Utc::now();
    rules::apply_offer_lifecycle(&mut state, now.into());
    let mut model = existing.into_active_model();
    apply_state(&mut model, &state);
    model.updated_at = Set(now.into());
    let model = model.update(db).await?;
    info!(offer = %model.id, status = ?model.status, "offer letter saved");
    Ok(model)
}

async fn require_offer(db: &DatabaseConnection, id: Uuid) -> HrmResult<offer_letter::Model> {
    offer_letter::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrmError::NotFound {
            entity: "offer letter",
        })
}
