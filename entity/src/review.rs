use crate::employee;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    pub employee_name: String,
    pub reviewer_id: Uuid,
    pub reviewer_name: String,
    pub period_start: Date,
    pub period_end: Date,
    pub review_type: ReviewType,
    /// Mean of the five category ratings, one decimal place.
    pub overall_rating: f64,
    pub performance_rating: i16,
    pub performance_comments: Option<String>,
    pub communication_rating: i16,
    pub communication_comments: Option<String>,
    pub teamwork_rating: i16,
    pub teamwork_comments: Option<String>,
    pub leadership_rating: i16,
    pub leadership_comments: Option<String>,
    pub problem_solving_rating: i16,
    pub problem_solving_comments: Option<String>,
    /// JSON array of strings.
    pub strengths: Json,
    /// JSON array of strings.
    pub areas_for_improvement: Json,
    /// JSON array of strings.
    pub goals: Json,
    pub feedback: String,
    pub employee_comments: Option<String>,
    pub status: Status,
    pub completed_date: Option<DateTimeWithTimeZone>,
    pub acknowledged_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::EmployeeId",
        to = "employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::ReviewerId",
        to = "employee::Column::Id"
    )]
    Reviewer,
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum ReviewType {
    #[sea_orm(string_value = "ANNUAL")]
    Annual,
    #[sea_orm(string_value = "SEMI_ANNUAL")]
    SemiAnnual,
    #[sea_orm(string_value = "QUARTERLY")]
    Quarterly,
    #[sea_orm(string_value = "PROBATION")]
    Probation,
    #[sea_orm(string_value = "PROJECT")]
    Project,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "ACKNOWLEDGED")]
    Acknowledged,
}

impl ActiveModelBehavior for ActiveModel {}
