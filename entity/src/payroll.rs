use crate::employee;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    pub employee_name: String,
    pub period_month: i16,
    pub period_year: i32,
    pub basic_salary: f64,
    pub allowance_hra: f64,
    pub allowance_transport: f64,
    pub allowance_medical: f64,
    pub allowance_other: f64,
    pub overtime_hours: f64,
    pub overtime_rate: f64,
    pub overtime_amount: f64,
    pub deduction_tax: f64,
    pub deduction_pf: f64,
    pub deduction_insurance: f64,
    pub deduction_other: f64,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
    pub status: Status,
    pub processed_date: Option<DateTimeWithTimeZone>,
    pub payment_date: Option<DateTimeWithTimeZone>,
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
}

impl Related<employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PROCESSED")]
    Processed,
    #[sea_orm(string_value = "PAID")]
    Paid,
}

impl ActiveModelBehavior for ActiveModel {}
