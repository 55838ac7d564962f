use crate::employee::Department;
use crate::recruitment::EmploymentType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "offer_letter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub candidate_name: String,
    #[sea_orm(indexed)]
    pub candidate_email: String,
    pub position: String,
    pub department: Department,
    pub salary: f64,
    pub currency: Currency,
    pub start_date: Date,
    pub reporting_manager: String,
    pub work_location: String,
    pub employment_type: EmploymentType,
    /// JSON array of strings.
    pub benefits: Json,
    pub probation_period_days: i32,
    pub notice_period_days: i32,
    pub offer_valid_until: DateTimeWithTimeZone,
    pub status: Status,
    pub sent_date: Option<DateTimeWithTimeZone>,
    pub response_date: Option<DateTimeWithTimeZone>,
    pub hr_contact_name: String,
    pub hr_contact_email: String,
    pub hr_contact_phone: String,
    pub additional_notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(8))")]
pub enum Currency {
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
    #[sea_orm(string_value = "GBP")]
    Gbp,
    #[sea_orm(string_value = "INR")]
    Inr,
    #[sea_orm(string_value = "CAD")]
    Cad,
    #[sea_orm(string_value = "AUD")]
    Aud,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum Status {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SENT")]
    Sent,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "DECLINED")]
    Declined,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

impl Status {
    /// Draft, Sent and Accepted offers block a new offer for the same
    /// candidate email.
    pub fn is_active(self) -> bool {
        matches!(self, Status::Draft | Status::Sent | Status::Accepted)
    }
}

impl ActiveModelBehavior for ActiveModel {}
