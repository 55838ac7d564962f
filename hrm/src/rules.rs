//! Pre-persistence derivation rules. Each is a pure function of the
//! record's own fields; the entity modules call them explicitly right
//! before a write so the dispatch stays visible and testable.

use chrono::NaiveDate;
use entity::offer_letter;
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::error::{HrmError, HrmResult};

/// Inclusive day count of a leave range. Signed: an inverted range yields
/// a non-positive count, which the leave write path rejects.
pub fn leave_total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Caller-controlled payroll components. Derived fields are deliberately
/// absent; they are always recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayrollInputs {
    pub basic_salary: f64,
    pub allowance_hra: f64,
    pub allowance_transport: f64,
    pub allowance_medical: f64,
    pub allowance_other: f64,
    pub overtime_hours: f64,
    pub overtime_rate: f64,
    pub deduction_tax: f64,
    pub deduction_pf: f64,
    pub deduction_insurance: f64,
    pub deduction_other: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PayrollTotals {
    pub overtime_amount: f64,
    pub gross_salary: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
}

/// Recomputes every derived payroll field from its components. Any
/// caller-supplied values for the derived fields are ignored.
pub fn compute_payroll(inputs: &PayrollInputs) -> PayrollTotals {
    let overtime_amount = inputs.overtime_hours * inputs.overtime_rate;
    let gross_salary = inputs.basic_salary
        + inputs.allowance_hra
        + inputs.allowance_transport
        + inputs.allowance_medical
        + inputs.allowance_other
        + overtime_amount;
    let total_deductions = inputs.deduction_tax
        + inputs.deduction_pf
        + inputs.deduction_insurance
        + inputs.deduction_other;
    PayrollTotals {
        overtime_amount,
        gross_salary,
        total_deductions,
        net_salary: gross_salary - total_deductions,
    }
}

/// The lifecycle-relevant slice of an offer letter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OfferState {
    pub status: offer_letter::Status,
    pub offer_valid_until: DateTimeWithTimeZone,
    pub sent_date: Option<DateTimeWithTimeZone>,
    pub response_date: Option<DateTimeWithTimeZone>,
}

/// Applies the offer-letter transitions in order: expiry first, then the
/// one-way date stamps. Stamped dates are never cleared, even if the
/// status later reverts.
pub fn apply_offer_lifecycle(state: &mut OfferState, now: DateTimeWithTimeZone) {
    if state.offer_valid_until < now && state.status == offer_letter::Status::Sent {
        state.status = offer_letter::Status::Expired;
    }
    if state.status == offer_letter::Status::Sent && state.sent_date.is_none() {
        state.sent_date = Some(now);
    }
    if matches!(
        state.status,
        offer_letter::Status::Accepted | offer_letter::Status::Declined
    ) && state.response_date.is_none()
    {
        state.response_date = Some(now);
    }
}

/// Mean of the five category ratings, rounded half-up to one decimal.
pub fn overall_rating(ratings: [i16; 5]) -> f64 {
    let sum: i16 = ratings.iter().sum();
    (f64::from(sum) / 5.0 * 10.0).round() / 10.0
}

/// Rejects an inverted salary range. No mutation on success.
pub fn validate_salary_range(min: f64, max: f64) -> HrmResult<()> {
    if min > max {
        return Err(HrmError::validation(
            "Minimum salary cannot be greater than maximum salary",
        ));
    }
    Ok(())
}
