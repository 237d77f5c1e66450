use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const ACCOUNT_NUMBER_MAX_LEN: usize = 34;
pub const HOLDER_NAME_MAX_LEN: usize = 128;
/// Column is `DECIMAL(15, 2)`; 15 significant digits also survive a trip through `f64`.
pub const BALANCE_SCALE: u32 = 2;
pub const BALANCE_INTEGER_DIGITS: u32 = 13;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub account_number: String,
    pub account_holder_name: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub balance: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_account_number(n: &str) -> Result<(), ModelError> {
    if n.is_empty() {
        return Err(ModelError::Validation("accountNumber must not be blank".into()));
    }
    if n.chars().count() > ACCOUNT_NUMBER_MAX_LEN {
        return Err(ModelError::Validation(format!("accountNumber must be at most {ACCOUNT_NUMBER_MAX_LEN} characters")));
    }
    if !n.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ModelError::Validation("accountNumber may only contain letters and digits".into()));
    }
    Ok(())
}

pub fn validate_holder_name(name: &str) -> Result<(), ModelError> {
    if name.is_empty() {
        return Err(ModelError::Validation("accountHolderName must not be blank".into()));
    }
    if name.chars().count() > HOLDER_NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("accountHolderName must be at most {HOLDER_NAME_MAX_LEN} characters")));
    }
    Ok(())
}

/// Sign is not constrained; precision must fit the column.
pub fn validate_balance(balance: Decimal) -> Result<(), ModelError> {
    if balance.normalize().scale() > BALANCE_SCALE {
        return Err(ModelError::Validation(format!("balance must have at most {BALANCE_SCALE} decimal places")));
    }
    if balance.trunc().abs() >= Decimal::from(10u64.pow(BALANCE_INTEGER_DIGITS)) {
        return Err(ModelError::Validation(format!(
            "balance must have at most {BALANCE_INTEGER_DIGITS} integer digits"
        )));
    }
    Ok(())
}

/// Validated business fields of an account, independent of its identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBankAccount {
    pub account_number: String,
    pub account_holder_name: String,
    pub balance: Decimal,
}

impl NewBankAccount {
    /// Trims both strings, then validates every field.
    pub fn new(account_number: &str, account_holder_name: &str, balance: Decimal) -> Result<Self, ModelError> {
        let account_number = account_number.trim();
        let account_holder_name = account_holder_name.trim();
        validate_account_number(account_number)?;
        validate_holder_name(account_holder_name)?;
        validate_balance(balance)?;
        Ok(Self {
            account_number: account_number.to_string(),
            account_holder_name: account_holder_name.to_string(),
            balance,
        })
    }

    /// Row for an insert; `id` stays unset so the database assigns it.
    pub fn into_active_model(self) -> ActiveModel {
        let now = Utc::now().into();
        ActiveModel {
            account_number: Set(self.account_number),
            account_holder_name: Set(self.account_holder_name),
            balance: Set(self.balance),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    /// Overwrites all business fields of `existing`, keeping its id and creation time.
    pub fn apply_to(self, existing: Model) -> ActiveModel {
        let mut am: ActiveModel = existing.into();
        am.account_number = Set(self.account_number);
        am.account_holder_name = Set(self.account_holder_name);
        am.balance = Set(self.balance);
        am.updated_at = Set(Utc::now().into());
        am
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn trims_and_accepts_valid_fields() {
        let acc = NewBankAccount::new(" INT123456 ", "  John Doe ", Decimal::new(100000, 2)).unwrap();
        assert_eq!(acc.account_number, "INT123456");
        assert_eq!(acc.account_holder_name, "John Doe");
        assert_eq!(acc.balance, Decimal::new(1000, 0));
    }

    #[test]
    fn rejects_blank_and_oversized_strings() {
        assert!(NewBankAccount::new("   ", "John", Decimal::ZERO).is_err());
        assert!(NewBankAccount::new("123", "  ", Decimal::ZERO).is_err());
        assert!(NewBankAccount::new(&"1".repeat(35), "John", Decimal::ZERO).is_err());
        assert!(NewBankAccount::new("123", &"a".repeat(129), Decimal::ZERO).is_err());
        assert!(NewBankAccount::new("12 34", "John", Decimal::ZERO).is_err());
    }

    #[test]
    fn balance_precision_and_range() {
        assert!(validate_balance(Decimal::new(-5000, 2)).is_ok());
        assert!(validate_balance(Decimal::new(1_500_000, 3)).is_ok()); // 1500.000 normalizes to 1500
        assert!(validate_balance(Decimal::new(1_000_005, 3)).is_err());
        assert!(validate_balance(Decimal::from(10u64.pow(13))).is_err());
        assert!(validate_balance(Decimal::new(999_999_999_999_999, 2)).is_ok());
        assert!(validate_balance(Decimal::new(-999_999_999_999_999, 2)).is_ok());
        assert!(validate_balance(Decimal::new(9_999_999_999_999_999, 2)).is_err());
    }

    #[test]
    fn insert_model_leaves_id_unset() {
        let am = NewBankAccount::new("123456789", "John Doe", Decimal::new(100000, 2))
            .unwrap()
            .into_active_model();
        assert!(matches!(am.id, ActiveValue::NotSet));
        assert_eq!(am.account_number, ActiveValue::Set("123456789".to_string()));
    }
}
