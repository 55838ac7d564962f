//! Employee directory write/read paths.

use chrono::{NaiveDate, Utc};
use entity::employee::{self, Department, Status};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{HrmError, HrmResult};
use crate::validate;

#[derive(Clone, Debug, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub employee_code: String,
    pub department: Department,
    pub position: String,
    pub salary: f64,
    pub join_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<Status>,
    pub manager_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<Department>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub join_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Option<Status>,
    pub manager_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmployeeFilter {
    pub department: Option<Department>,
    pub status: Option<Status>,
    /// Case-insensitive substring match over name, email and badge code.
    pub q: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EmployeeDashboard {
    pub total: u64,
    pub active: u64,
    pub by_department: Vec<DepartmentCount>,
}

#[derive(Clone, Debug, Serialize, FromQueryResult)]
pub struct DepartmentCount {
    pub department: Department,
    pub count: i64,
}

pub async fn create(db: &DatabaseConnection, input: NewEmployee) -> HrmResult<employee::Model> {
    let name = validate::require_text("name", &input.name, 100)?;
    let email = validate::normalize_email("email", &input.email)?;
    let employee_code = validate::require_text("employee code", &input.employee_code, 32)?;
    let position = validate::require_text("position", &input.position, 100)?;
    let salary = validate::non_negative("salary", input.salary)?;
    if let Some(manager_id) = input.manager_id {
        require_employee(db, manager_id, "manager").await?;
    }

    let now = Utc::now();
    let model = employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        employee_code: Set(employee_code),
        department: Set(input.department),
        position: Set(position),
        salary: Set(salary),
        join_date: Set(input.join_date.unwrap_or_else(|| now.date_naive())),
        phone: Set(input.phone),
        address: Set(input.address),
        status: Set(input.status.unwrap_or(Status::Active)),
        manager_id: Set(input.manager_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(employee = %model.id, code = %model.employee_code, "employee created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateEmployee,
) -> HrmResult<employee::Model> {
    let existing = require_employee(db, id, "employee").await?;
    let mut model = existing.into_active_model();

    if let Some(name) = input.name {
        model.name = Set(validate::require_text("name", &name, 100)?);
    }
    if let Some(email) = input.email {
        model.email = Set(validate::normalize_email("email", &email)?);
    }
    if let Some(department) = input.department {
        model.department = Set(department);
    }
    if let Some(position) = input.position {
        model.position = Set(validate::require_text("position", &position, 100)?);
    }
    if let Some(salary) = input.salary {
        model.salary = Set(validate::non_negative("salary", salary)?);
    }
    if let Some(join_date) = input.join_date {
        model.join_date = Set(join_date);
    }
    if let Some(phone) = input.phone {
        model.phone = Set(Some(phone));
    }
    if let Some(address) = input.address {
        model.address = Set(Some(address));
    }
    if let Some(status) = input.status {
        model.status = Set(status);
    }
    if let Some(manager_id) = input.manager_id {
        if manager_id == id {
            return Err(HrmError::validation("An employee cannot manage themselves"));
        }
        require_employee(db, manager_id, "manager").await?;
        model.manager_id = Set(Some(manager_id));
    }
    model.updated_at = Set(Utc::now().into());

    Ok(model.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> HrmResult<employee::Model> {
    require_employee(db, id, "employee").await
}

pub async fn list(
    db: &DatabaseConnection,
    filter: EmployeeFilter,
    first: Option<i32>,
    offset: Option<i32>,
) -> HrmResult<Vec<employee::Model>> {
    let (limit, skip) = validate::page_window(first, offset);
    let mut query = employee::Entity::find();
    if let Some(department) = filter.department {
        query = query.filter(employee::Column::Department.eq(department));
    }
    if let Some(status) = filter.status {
        query = query.filter(employee::Column::Status.eq(status));
    }
    if let Some(q) = filter.q {
        let trimmed = q.trim().to_lowercase();
        if !trimmed.is_empty() {
            let pattern = format!("%{}%", trimmed);
            let name_expr = Expr::expr(Func::lower(Expr::col(employee::Column::Name)));
            let email_expr = Expr::expr(Func::lower(Expr::col(employee::Column::Email)));
            let code_expr = Expr::expr(Func::lower(Expr::col(employee::Column::EmployeeCode)));
            query = query.filter(
                Condition::any()
                    .add(name_expr.like(pattern.clone()))
                    .add(email_expr.like(pattern.clone()))
                    .add(code_expr.like(pattern)),
            );
        }
    }
    Ok(query
        .order_by_asc(employee::Column::Name)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> HrmResult<()> {
    let result = employee::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmError::NotFound {
            entity: "employee",
        });
    }
    info!(employee = %id, "employee deleted");
    Ok(())
}

pub async fn dashboard(db: &DatabaseConnection) -> HrmResult<EmployeeDashboard> {
    let total = employee::Entity::find().count(db).await?;
    let active = employee::Entity::find()
        .filter(employee::Column::Status.eq(Status::Active))
        .count(db)
        .await?;
    let by_department = employee::Entity::find()
        .select_only()
        .column(employee::Column::Department)
        .column_as(employee::Column::Id.count(), "count")
        .group_by(employee::Column::Department)
        .into_model::<DepartmentCount>()
        .all(db)
        .await?;
    Ok(EmployeeDashboard {
        total,
        active,
        by_department,
    })
}

/// Shared reference check; `entity` names the role the employee plays in
/// the failing lookup (manager, approver, reviewer, ...).
pub(crate) async fn require_employee(
    db: &DatabaseConnection,
    id: Uuid,
    entity: &'static str,
) -> HrmResult<employee::Model> {
    employee::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrmError::NotFound { entity })
}
