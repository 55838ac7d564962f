use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Human-readable badge id, distinct from the row id.
    #[sea_orm(unique)]
    pub employee_code: String,
    pub department: Department,
    pub position: String,
    pub salary: f64,
    pub join_date: Date,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: Status,
    #[sea_orm(indexed)]
    pub manager_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Manager,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Department {
    #[sea_orm(string_value = "ENGINEERING")]
    Engineering,
    #[sea_orm(string_value = "MARKETING")]
    Marketing,
    #[sea_orm(string_value = "HR")]
    Hr,
    #[sea_orm(string_value = "FINANCE")]
    Finance,
    #[sea_orm(string_value = "SALES")]
    Sales,
    #[sea_orm(string_value = "OPERATIONS")]
    Operations,
    #[sea_orm(string_value = "DESIGN")]
    Design,
    #[sea_orm(string_value = "SUPPORT")]
    Support,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
    #[sea_orm(string_value = "TERMINATED")]
    Terminated,
}

impl ActiveModelBehavior for ActiveModel {}
