use crate::employee::{self, Department};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "recruitment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_title: String,
    #[sea_orm(indexed)]
    pub department: Department,
    pub job_description: String,
    /// JSON array of strings.
    pub requirements: Json,
    pub location: String,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub salary_min: f64,
    pub salary_max: f64,
    pub status: Status,
    pub posted_date: Date,
    pub closing_date: Date,
    pub applicants_count: i32,
    pub hiring_manager_id: Uuid,
    /// JSON array of strings.
    pub skills: Json,
    /// JSON array of strings.
    pub benefits: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "employee::Entity",
        from = "Column::HiringManagerId",
        to = "employee::Column::Id"
    )]
    HiringManager,
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HiringManager.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum EmploymentType {
    #[sea_orm(string_value = "FULL_TIME")]
    FullTime,
    #[sea_orm(string_value = "PART_TIME")]
    PartTime,
    #[sea_orm(string_value = "CONTRACT")]
    Contract,
    #[sea_orm(string_value = "INTERNSHIP")]
    Internship,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum ExperienceLevel {
    #[sea_orm(string_value = "ENTRY")]
    Entry,
    #[sea_orm(string_value = "MID")]
    Mid,
    #[sea_orm(string_value = "SENIOR")]
    Senior,
    #[sea_orm(string_value = "EXECUTIVE")]
    Executive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    #[sea_orm(string_value = "ON_HOLD")]
    OnHold,
    #[sea_orm(string_value = "FILLED")]
    Filled,
}

impl ActiveModelBehavior for ActiveModel {}
