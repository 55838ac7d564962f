//! Leave request write paths: duration derivation, overlap checks and the
//! approval flow.

use chrono::{NaiveDate, Utc};
use entity::leave::{self, LeaveType, Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::employees::require_employee;
use crate::error::{HrmError, HrmResult};
use crate::{rules, validate};

#[derive(Clone, Debug, Deserialize)]
pub struct NewLeave {
    pub employee_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateLeave {
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LeaveFilter {
    pub employee_id: Option<Uuid>,
    pub status: Option<Status>,
    pub leave_type: Option<LeaveType>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LeaveDashboard {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub approved_days: i64,
}

pub async fn create(db: &DatabaseConnection, input: NewLeave) -> HrmResult<leave::Model> {
    let employee = require_employee(db, input.employee_id, "employee").await?;
    let reason = validate::require_text("reason", &input.reason, 500)?;
    let total_days = derive_total_days(input.start_date, input.end_date)?;
    ensure_no_overlap(db, input.employee_id, input.start_date, input.end_date).await?;

    let now = Utc::now();
    let model = leave::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        employee_name: Set(employee.name),
        leave_type: Set(input.leave_type),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        total_days: Set(total_days),
        reason: Set(reason),
        status: Set(Status::Pending),
        approved_by: Set(None),
        approved_date: Set(None),
        comments: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(leave = %model.id, employee = %model.employee_id, days = model.total_days, "leave request created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateLeave,
) -> HrmResult<leave::Model> {
    let existing = require_leave(db, id).await?;
    // Total days are re-derived whenever either endpoint changes.
    let start_date = input.start_date.unwrap_or(existing.start_date);
    let end_date = input.end_date.unwrap_or(existing.end_date);
    let total_days = derive_total_days(start_date, end_date)?;

    let mut model = existing.into_active_model();
    if let Some(leave_type) = input.leave_type {
        model.leave_type = Set(leave_type);
    }
    if let Some(reason) = input.reason {
        model.reason = Set(validate::require_text("reason", &reason, 500)?);
    }
    model.start_date = Set(start_date);
    model.end_date = Set(end_date);
    model.total_days = Set(total_days);
    model.updated_at = Set(Utc::now().into());
    Ok(model.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> HrmResult<leave::Model> {
    require_leave(db, id).await
}

pub async fn list(
    db: &DatabaseConnection,
    filter: LeaveFilter,
    first: Option<i32>,
    offset: Option<i32>,
) -> HrmResult<Vec<leave::Model>> {
    let (limit, skip) = validate::page_window(first, offset);
    let mut query = leave::Entity::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(leave::Column::EmployeeId.eq(employee_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(leave::Column::Status.eq(status));
    }
    if let Some(leave_type) = filter.leave_type {
        query = query.filter(leave::Column::LeaveType.eq(leave_type));
    }
    Ok(query
        .order_by_desc(leave::Column::StartDate)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?)
}

pub async fn approve(
    db: &DatabaseConnection,
    id: Uuid,
    approver_id: Uuid,
    comments: Option<String>,
) -> HrmResult<leave::Model> {
    resolve(db, id, approver_id, comments, Status::Approved).await
}

pub async fn reject(
    db: &DatabaseConnection,
    id: Uuid,
    approver_id: Uuid,
    comments: Option<String>,
) -> HrmResult<leave::Model> {
    resolve(db, id, approver_id, comments, Status::Rejected).await
}

async fn resolve(
    db: &DatabaseConnection,
    id: Uuid,
    approver_id: Uuid,
    comments: Option<String>,
    status: Status,
) -> HrmResult<leave::Model> {
    let existing = require_leave(db, id).await?;
    if existing.status != Status::Pending {
        return Err(HrmError::validation(
            "Only pending leave requests can be approved or rejected",
        ));
    }
    require_employee(db, approver_id, "approver").await?;
    let comments = validate::optional_text("comments", comments, 300)?;

    let mut model = existing.into_active_model();
    let now = Utc::now();
    model.status = Set(status);
    model.approved_by = Set(Some(approver_id));
    model.approved_date = Set(Some(now.into()));
    model.comments = Set(comments);
    model.updated_at = Set(now.into());
    let model = model.update(db).await?;
    info!(leave = %model.id, status = ?model.status, "leave request resolved");
    Ok(model)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> HrmResult<()> {
    let result = leave::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmError::NotFound {
            entity: "leave request",
        });
    }
    Ok(())
}

pub async fn dashboard(db: &DatabaseConnection) -> HrmResult<LeaveDashboard> {
    let pending = count_status(db, Status::Pending).await?;
    let approved = count_status(db, Status::Approved).await?;
    let rejected = count_status(db, Status::Rejected).await?;

    #[derive(FromQueryResult)]
    struct DaysRow {
        days: Option<i64>,
    }
    let row = leave::Entity::find()
        .select_only()
        .column_as(leave::Column::TotalDays.sum(), "days")
        .filter(leave::Column::Status.eq(Status::Approved))
        .into_model::<DaysRow>()
        .one(db)
        .await?;
    let approved_days = row.and_then(|r| r.days).unwrap_or(0);

    Ok(LeaveDashboard {
        pending,
        approved,
        rejected,
        approved_days,
    })
}

async fn count_status(db: &DatabaseConnection, status: Status) -> HrmResult<u64> {
    Ok(leave::Entity::find()
        .filter(leave::Column::Status.eq(status))
        .count(db)
        .await?)
}

fn derive_total_days(start: NaiveDate, end: NaiveDate) -> HrmResult<i32> {
    let total_days = rules::leave_total_days(start, end);
    if total_days <= 0 {
        return Err(HrmError::validation(
            "End date must be on or after start date",
        ));
    }
    Ok(total_days as i32)
}

/// Rejects a new request overlapping any Pending/Approved leave for the
/// same employee.
async fn ensure_no_overlap(
    db: &DatabaseConnection,
    employee_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> HrmResult<()> {
    let overlapping = leave::Entity::find()
        .filter(leave::Column::EmployeeId.eq(employee_id))
        .filter(leave::Column::Status.is_in([Status::Pending, Status::Approved]))
        .filter(leave::Column::StartDate.lte(end_date))
        .filter(leave::Column::EndDate.gte(start_date))
        .one(db)
        .await?;
    if overlapping.is_some() {
        return Err(HrmError::validation(
            "Leave request overlaps with existing leave",
        ));
    }
    Ok(())
}

async fn require_leave(db: &DatabaseConnection, id: Uuid) -> HrmResult<leave::Model> {
    leave::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrmError::NotFound {
            entity: "leave request",
        })
}
