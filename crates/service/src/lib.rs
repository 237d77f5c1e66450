//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Owns transaction boundaries: every mutating operation commits once or not at all.

pub mod errors;
pub mod bank_account;
#[cfg(test)]
pub mod test_support;
