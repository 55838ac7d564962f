use crate::employee;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "leave")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    /// Name snapshot taken at creation; intentionally stale on renames.
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: Date,
    pub end_date: Date,
    pub total_days: i32,
    pub reason: String,
    pub status: Status,
    pub approved_by: Option<Uuid>,
    pub approved_date: Option<DateTimeWithTimeZone>,
    pub comments: Option<String>,
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
        from = "Column::ApprovedBy",
        to = "employee::Column::Id",
        on_delete = "SetNull"
    )]
    Approver,
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum LeaveType {
    #[sea_orm(string_value = "VACATION")]
    Vacation,
    #[sea_orm(string_value = "SICK")]
    Sick,
    #[sea_orm(string_value = "PERSONAL")]
    Personal,
    #[sea_orm(string_value = "MATERNITY")]
    Maternity,
    #[sea_orm(string_value = "PATERNITY")]
    Paternity,
    #[sea_orm(string_value = "EMERGENCY")]
    Emergency,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl ActiveModelBehavior for ActiveModel {}
