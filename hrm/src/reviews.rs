//! Performance review write paths and rating aggregation.

use chrono::{NaiveDate, Utc};
use entity::review::{self, ReviewType, Status};
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
pub struct CategoryScore {
    pub rating: i16,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewReview {
    pub employee_id: Uuid,
    pub reviewer_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub review_type: ReviewType,
    pub performance: CategoryScore,
    pub communication: CategoryScore,
    pub teamwork: CategoryScore,
    pub leadership: CategoryScore,
    pub problem_solving: CategoryScore,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub goals: Vec<String>,
    pub feedback: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateReview {
    pub performance: Option<CategoryScore>,
    pub communication: Option<CategoryScore>,
    pub teamwork: Option<CategoryScore>,
    pub leadership: Option<CategoryScore>,
    pub problem_solving: Option<CategoryScore>,
    pub strengths: Option<Vec<String>>,
    pub areas_for_improvement: Option<Vec<String>>,
    pub goals: Option<Vec<String>>,
    pub feedback: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReviewDashboard {
    pub total: u64,
    pub draft: u64,
    pub completed: u64,
    pub acknowledged: u64,
    /// Mean overall rating across finished (Completed/Acknowledged) reviews.
    pub average_rating: f64,
    pub rating_distribution: Vec<RatingCount>,
}

#[derive(Clone, Copy, Debug, Serialize, FromQueryResult)]
pub struct RatingCount {
    pub rating: f64,
    pub count: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewFilter {
    pub employee_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub review_type: Option<ReviewType>,
    pub status: Option<Status>,
}

pub async fn create(db: &DatabaseConnection, input: NewReview) -> HrmResult<review::Model> {
    let employee = require_employee(db, input.employee_id, "employee").await?;
    let reviewer = require_employee(db, input.reviewer_id, "reviewer").await?;
    if input.period_end < input.period_start {
        return Err(HrmError::validation(
            "Review period end must be on or after its start",
        ));
    }

    let performance = check_category("performance", input.performance)?;
    let communication = check_category("communication", input.communication)?;
    let teamwork = check_category("teamwork", input.teamwork)?;
    let leadership = check_category("leadership", input.leadership)?;
    let problem_solving = check_category("problem solving", input.problem_solving)?;
    let overall = rules::overall_rating([
        performance.rating,
        communication.rating,
        teamwork.rating,
        leadership.rating,
        problem_solving.rating,
    ]);

    let strengths = validate::require_list("strengths", input.strengths)?;
    let areas = validate::require_list("areas for improvement", input.areas_for_improvement)?;
    let goals = validate::require_list("goals", input.goals)?;
    let feedback = validate::require_text("feedback", &input.feedback, 1000)?;

    let now = Utc::now();
    let model = review::ActiveModel {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        employee_name: Set(employee.name),
        reviewer_id: Set(reviewer.id),
        reviewer_name: Set(reviewer.name),
        period_start: Set(input.period_start),
        period_end: Set(input.period_end),
        review_type: Set(input.review_type),
        overall_rating: Set(overall),
        performance_rating: Set(performance.rating),
        performance_comments: Set(performance.comments),
        communication_rating: Set(communication.rating),
        communication_comments: Set(communication.comments),
        teamwork_rating: Set(teamwork.rating),
        teamwork_comments: Set(teamwork.comments),
        leadership_rating: Set(leadership.rating),
        leadership_comments: Set(leadership.comments),
        problem_solving_rating: Set(problem_solving.rating),
        problem_solving_comments: Set(problem_solving.comments),
        strengths: Set(strengths),
        areas_for_improvement: Set(areas),
        goals: Set(goals),
        feedback: Set(feedback),
        employee_comments: Set(None),
        status: Set(Status::Draft),
        completed_date: Set(None),
        acknowledged_date: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    info!(review = %model.id, employee = %model.employee_id, rating = model.overall_rating, "review created");
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateReview,
) -> HrmResult<review::Model> {
    let existing = require_review(db, id).await?;
    if existing.status == Status::Acknowledged {
        return Err(HrmError::validation(
            "Acknowledged reviews can no longer be edited",
        ));
    }

    let mut ratings = [
        existing.performance_rating,
        existing.communication_rating,
        existing.teamwork_rating,
        existing.leadership_rating,
        existing.problem_solving_rating,
    ];
    let mut model = existing.into_active_model();

    if let Some(score) = input.performance {
        let score = check_category("performance", score)?;
        ratings[0] = score.rating;
        model.performance_rating = Set(score.rating);
        model.performance_comments = Set(score.comments);
    }
    if let Some(score) = input.communication {
        let score = check_category("communication", score)?;
        ratings[1] = score.rating;
        model.communication_rating = Set(score.rating);
        model.communication_comments = Set(score.comments);
    }
    if let Some(score) = input.teamwork {
        let score = check_category("teamwork", score)?;
        ratings[2] = score.rating;
        model.teamwork_rating = Set(score.rating);
        model.teamwork_comments = Set(score.comments);
    }
    if let Some(score) = input.leadership {
        let score = check_category("leadership", score)?;
        ratings[3] = score.rating;
        model.leadership_rating = Set(score.rating);
        model.leadership_comments = Set(score.comments);
    }
    if let Some(score) = input.problem_solving {
        let score = check_category("problem solving", score)?;
        ratings[4] = score.rating;
        model.problem_solving_rating = Set(score.rating);
        model.problem_solving_comments = Set(score.comments);
    }
    if let Some(strengths) = input.strengths {
        model.strengths = Set(validate::require_list("strengths", strengths)?);
    }
    if let Some(areas) = input.areas_for_improvement {
        model.areas_for_improvement =
            Set(validate::require_list("areas for improvement", areas)?);
    }
    if let Some(goals) = input.goals {
        model.goals = Set(validate::require_list("goals", goals)?);
    }
    if let Some(feedback) = input.feedback {
        model.feedback = Set(validate::require_text("feedback", &feedback, 1000)?);
    }

    // The aggregate always reflects the stored categories, whatever the
    // caller sent for it.
    model.overall_rating = Set(rules::overall_rating(ratings));
    model.updated_at = Set(Utc::now().into());
    Ok(model.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> HrmResult<review::Model> {
    require_review(db, id).await
}

pub async fn list(
    db: &DatabaseConnection,
    filter: ReviewFilter,
    first: Option<i32>,
    offset: Option<i32>,
) -> HrmResult<Vec<review::Model>> {
    let (limit, skip) = validate::page_window(first, offset);
    let mut query = review::Entity::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(review::Column::EmployeeId.eq(employee_id));
    }
    if let Some(reviewer_id) = filter.reviewer_id {
        query = query.filter(review::Column::ReviewerId.eq(reviewer_id));
    }
    if let Some(review_type) = filter.review_type {
        query = query.filter(review::Column::ReviewType.eq(review_type));
    }
    if let Some(status) = filter.status {
        query = query.filter(review::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(review::Column::PeriodEnd)
        .limit(limit)
        .offset(skip)
        .all(db)
        .await?)
}

/// Draft -> Completed, stamping the completion time.
pub async fn complete(db: &DatabaseConnection, id: Uuid) -> HrmResult<review::Model> {
    let existing = require_review(db, id).await?;
    if existing.status != Status::Draft {
        return Err(HrmError::validation("Only draft reviews can be completed"));
    }
    let mut model = existing.into_active_model();
    let now = Utc::now();
    model.status = Set(Status::Completed);
    model.completed_date = Set(Some(now.into()));
    model.updated_at = Set(now.into());
    let model = model.update(db).await?;
    info!(review = %model.id, "review completed");
    Ok(model)
}

/// Completed -> Acknowledged, with the employee's optional comments.
pub async fn acknowledge(
    db: &DatabaseConnection,
    id: Uuid,
    employee_comments: Option<String>,
) -> HrmResult<review::Model> {
    let existing = require_review(db, id).await?;
    if existing.status != Status::Completed {
        return Err(HrmError::validation(
            "Only completed reviews can be acknowledged",
        ));
    }
    let comments = validate::optional_text("employee comments", employee_comments, 1000)?;
    let mut model = existing.into_active_model();
    let now = Utc::now();
    model.status = Set(Status::Acknowledged);
    model.acknowledged_date = Set(Some(now.into()));
    model.employee_comments = Set(comments);
    model.updated_at = Set(now.into());
    let model = model.update(db).await?;
    info!(review = %model.id, "review acknowledged");
    Ok(model)
}

pub async fn dashboard(db: &DatabaseConnection) -> HrmResult<ReviewDashboard> {
    let total = review::Entity::find().count(db).await?;
    let draft = count_status(db, Status::Draft).await?;
    let completed = count_status(db, Status::Completed).await?;
    let acknowledged = count_status(db, Status::Acknowledged).await?;

    // Drafts are still being edited; the aggregate views cover reviews
    // whose ratings are final.
    let finished = completed + acknowledged;
    let average_rating = if finished == 0 {
        0.0
    } else {
        #[derive(FromQueryResult)]
        struct RatingRow {
            total: Option<f64>,
        }
        let row = review::Entity::find()
            .select_only()
            .column_as(review::Column::OverallRating.sum(), "total")
            .filter(review::Column::Status.is_in([Status::Completed, Status::Acknowledged]))
            .into_model::<RatingRow>()
            .one(db)
            .await?;
        row.and_then(|r| r.total).unwrap_or(0.0) / finished as f64
    };

    let rating_distribution = review::Entity::find()
        .select_only()
        .column_as(review::Column::OverallRating, "rating")
        .column_as(review::Column::Id.count(), "count")
        .filter(review::Column::Status.is_in([Status::Completed, Status::Acknowledged]))
        .group_by(review::Column::OverallRating)
        .order_by_asc(review::Column::OverallRating)
        .into_model::<RatingCount>()
        .all(db)
        .await?;

    Ok(ReviewDashboard {
        total,
        draft,
        completed,
        acknowledged,
        average_rating,
        rating_distribution,
    })
}

async fn count_status(db: &DatabaseConnection, status: Status) -> HrmResult<u64> {
    Ok(review::Entity::find()
        .filter(review::Column::Status.eq(status))
        .count(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> HrmResult<()> {
    let result = review::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmError::NotFound { entity: "review" });
    }
    Ok(())
}

/// Mean overall rating across an employee's reviews, if any exist.
pub async fn average_rating(db: &DatabaseConnection, employee_id: Uuid) -> HrmResult<Option<f64>> {
    let count = review::Entity::find()
        .filter(review::Column::EmployeeId.eq(employee_id))
        .count(db)
        .await?;
    if count == 0 {
        return Ok(None);
    }

    #[derive(FromQueryResult)]
    struct SumRow {
        total: Option<f64>,
    }
    let row = review::Entity::find()
        .select_only()
        .column_as(review::Column::OverallRating.sum(), "total")
        .filter(review::Column::EmployeeId.eq(employee_id))
        .into_model::<SumRow>()
        .one(db)
        .await?;
    Ok(row.and_then(|r| r.total).map(|total| total / count as f64))
}

fn check_category(field: &str, score: CategoryScore) -> HrmResult<CategoryScore> {
    validate::rating(field, score.rating)?;
    let comments = validate::optional_text(field, score.comments, 500)?;
    Ok(CategoryScore {
        rating: score.rating,
        comments,
    })
}

async fn require_review(db: &DatabaseConnection, id: Uuid) -> HrmResult<review::Model> {
    review::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(HrmError::NotFound { entity: "review" })
}
