pub mod employee;
pub mod leave;
pub mod offer_letter;
pub mod payroll;
pub mod recruitment;
pub mod review;
