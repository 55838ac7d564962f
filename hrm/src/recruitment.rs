//! Job posting write paths, including the salary-range guard.

use chrono::{NaiveDate, Utc};
use entity::employee::Department;
use entity::recruitment::{self, EmploymentType, ExperienceLevel, Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::employees::{require_employee, DepartmentCount};
use crate::error::{HrmError, HrmResult};
use crate::{rules, validate};

#[derive(Clone, Debug, Deserialize)]
pub struct NewJobPosting {
    pub job_title: String,
    pub department: Department,
    pub job_description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub salary_min: f64,
    pub salary_max: f64,
    pub posted_date: Option<NaiveDate>,
    pub closing_date: NaiveDate,
    pub hiring_manager_id: Uuid,
    pub skills: Vec<String>,
    pub benefits: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateJobPosting {
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub status: Option<Status>,
    pub closing_date: Option<NaiveDate>,
    pub skills: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecruitmentDashboard {
    pub total: u64,
    pub open: u64,
    pub closed: u64,
    pub on_hold: u64,
    pub filled: u64,
    pub by_department: Vec<DepartmentCount>,
    /// Applicants recorded across all postings.
    pub total_applicants: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobPostingFilter {
    pub department: Option<Department>,
    pub status: Option<Status>,
    pub experience_level: Option<ExperienceLevel>,
}

pub async fn create(
    db: &DatabaseConnection,
    input: NewJobPosting,
) -> HrmResult<recruitment::Model> {
    let job_title = validate::require_text("job title", &input.job_title, 100)?;
    let job_description =
        validate::require_text("job description", &input.job_description, 2000)?;
    let location = validate::require_text("location", &input.location, 256)?;
    let requirements = validate::require_list("requirements", input.requirements)?;
    let skills = validate::require_list("skills", input.skills)?;
    let salary_min = validate::non_negative("minimum salary", input.salary_min)?;
    let salary_max = validate::non_negative("maximum salary", input.salary_max)?;
    rules::validate_salary_range(salary_min, salary_max)?;
    require_employee(db, input.hiring_manager_id, "hiring manager").await?;

    let now = Utc::now();
    let model = recruitment::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_title: Set(job_title),
        department: Set(input.department),
        job_description: Set(job_description),
        requirements: Set(requirements),
        location: Set(location),
        employment_type: Set(input.employment_type),
        experience_level: Set(input.experience_level),
        salary_min: Set(salary_min),
        salary_max: Set(salary_max),
        status: Set(Status::Open),
        posted_date: Set(input.posted_date.unwrap_or_else(|| now.date_naive())),
        closing_date: Set(input.closing_date),
        applicants_count: Set(0),
        hiring_manager_id: Set(input.hiring_manager_id),
        skills: Set(skills),
        benefits: Set(validate::string_list(input.benefits.unwrap_or_default())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(posting = %model.id, title = %model.job_title, "job posting created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateJobPosting,
) -> HrmResult<recruitment::Model> {
    let existing = require_posting(db, id).await?;
    // The range rule sees the merged values, so a partial update cannot
    // sneak an inverted range past it.
    let salary_min = match input.salary_min {
        Some(min) => validate::non_negative("minimum salary", min)?,
        None => existing.salary_min,
    };
    let salary_max = match input.salary_max {
        Some(max) => validate::non_negative("maximum salary", max)?,
        None => existing.salary_max,
    };
    rules::validate_salary_range(salary_min, salary_max)?;

    let mut model = existing.into_active_model();
    if let Some(job_title) = input.job_title {
        model.job_title = Set(validate::require_text("job title", &job_title, 100)?);
    }
    if let Some(description) = input.job_description {
        model.job_description =
            Set(validate::require_text("job description", &description, 2000)?);
    }
    if let Some(requirements) = input.requirements {
        model.requirements = Set(validate::require_list("requirements", requirements)?);
    }
    if let Some(location) = input.location {
        model.location = Set(validate::require_text("location", &location, 256)?);
    }
    if let Some(status) = input.status {
        model.status = Set(status);
    }
    if let Some(closing_date) = input.closing_date {
        model.closing_date = Set(closing_date);
    }
    if let Some(skills) = input.skills {
        model.skills = Set(validate::require_list("skills", skills)?);
    }
    if let Some(benefits) = input.benefits {
        model.benefits = Set(validate::string_list(benefits));
    }
    model.salary_min = Set(salary_min);
    model.salary_max = Set(salary_max);
    model.updated_at = Set(Utc::now().into());
    Ok(model.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> HrmResult<recruitment::Model> {
    require_posting(db, id).await
}

pub async fn list(
    db: &DatabaseConnection,
    filter: JobPostingFilter,
    first: Option<i32>,
    offset: Option<i32>,
) -> HrmResult<Vec<recruitment::Model>> {
    let (limit, skip) = validate::page_window(first, offset);
    let mut query = recruitment::Entity::find();
    if let Some(department) = filter.department {
        query = query.filter(recruitment::Column::Department.eq(department));
    }
    if let Some(status) = filter.status {
        query = query.filter(recruitment::Column::Status.eq(status));
    }
    if let Some(level) = filter.experience_level {
        query = query.filter(recruitment::Column::ExperienceLevel.eq(level));
    }
    Ok(query
        .order_by_desc(recruitment::Column::PostedDate)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?)
}

/// Bumps the applicant counter for an open posting.
pub async fn record_application(
    db: &DatabaseConnection,
    id: Uuid,
) -> HrmResult<recruitment::Model> {
    let existing = require_posting(db, id).await?;
    if existing.status != Status::Open {
        return Err(HrmError::validation(
            "Applications can only be recorded for open postings",
        ));
    }
    let next = existing.applicants_count + 1;
    let mut model = existing.into_active_model();
    model.applicants_count = Set(next);
    model.updated_at = Set(Utc::now().into());
    Ok(model.update(db).await?)
}

pub async fn dashboard(db: &DatabaseConnection) -> HrmResult<RecruitmentDashboard> {
    let total = recruitment::Entity::find().count(db).await?;
    let open = count_status(db, Status::Open).await?;
    let closed = count_status(db, Status::Closed).await?;
    let on_hold = count_status(db, Status::OnHold).await?;
    let filled = count_status(db, Status::Filled).await?;

    let by_department = recruitment::Entity::find()
        .select_only()
        .column(recruitment::Column::Department)
        .column_as(recruitment::Column::Id.count(), "count")
        .group_by(recruitment::Column::Department)
        .into_model::<DepartmentCount>()
        .all(db)
        .await?;

    #[derive(FromQueryResult)]
    struct ApplicantsRow {
        applicants: Option<i64>,
    }
    let row = recruitment::Entity::find()
        .select_only()
        .column_as(recruitment::Column::ApplicantsCount.sum(), "applicants")
        .into_model::<ApplicantsRow>()
        .one(db)
        .await?;
    let total_applicants = row.and_then(|r| r.applicants).unwrap_or(0);

    Ok(RecruitmentDashboard {
        total,
        open,
        closed,
        on_hold,
        filled,
        by_department,
        total_applicants,
    })
}

async fn count_status(db: &DatabaseConnection, status: Status) -> HrmResult<u64> {
    Ok(recruitment::Entity::find()
        .filter(recruitment::Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> HrmResult<()> {
    let result = recruitment::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmError::NotFound {
            entity: "job posting",
        });
    }
    Ok(())
}

async fn require_posting(db: &DatabaseConnection, id: Uuid) -> HrmResult<recruitment::Model> {
    recruitment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrmError::NotFound {
            entity: "job posting",
        })
}
