use models::errors::ModelError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn duplicate_account_number(number: &str) -> Self {
        Self::Conflict(format!("account number {} already exists", number))
    }

    /// Writes can race past the service-level uniqueness check; the index still catches them.
    pub fn from_write_err(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            _ => Self::from(e),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { Self::Db(e.to_string()) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_kind() {
        let v: ServiceError = ModelError::Validation("bad".into()).into();
        assert!(matches!(v, ServiceError::Validation(m) if m == "bad"));
        let d: ServiceError = ModelError::Db("down".into()).into();
        assert!(matches!(d, ServiceError::Db(_)));
    }

    #[test]
    fn non_constraint_write_errors_are_db_errors() {
        let e = ServiceError::from_write_err(DbErr::Custom("boom".into()));
        assert!(matches!(e, ServiceError::Db(_)));
    }

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(ServiceError::not_found("bank_account", 7).to_string(), "not found: bank_account 7 not found");
        assert_eq!(
            ServiceError::duplicate_account_number("123").to_string(),
            "conflict: account number 123 already exists"
        );
    }
}
