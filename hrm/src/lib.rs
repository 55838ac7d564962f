//! Derived-state and lifecycle rules for the HRM collections, plus the
//! storage-access layer that dispatches them on every write.
//!
//! The rules in [`rules`] are pure functions; each entity module
//! (`employees`, `leave`, `payroll`, `offers`, `recruitment`, `reviews`)
//! owns the write path that validates input, checks references, invokes
//! the entity's rule and persists the result. Uniqueness is ultimately
//! enforced by database constraints and surfaced as named conflicts.

pub mod employees;
pub mod error;
pub mod leave;
pub mod offers;
pub mod payroll;
pub mod recruitment;
pub mod reviews;
pub mod rules;
pub mod seed;
pub(crate) mod validate;

pub use error::{HrmError, HrmResult};
