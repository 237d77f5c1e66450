use models::bank_account::{Model, NewBankAccount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Body of create and update requests.
///
/// Fields are optional on the wire so that an omitted field surfaces as a
/// validation error instead of a deserialization failure. Unknown fields such
/// as an echoed `id` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountRequest {
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl BankAccountRequest {
    pub fn new(account_number: &str, account_holder_name: &str, balance: Decimal) -> Self {
        Self {
            account_number: Some(account_number.to_string()),
            account_holder_name: Some(account_holder_name.to_string()),
            balance: Some(balance),
        }
    }

    /// Checks presence of every field, then the model-level rules.
    ///
    /// ```
    /// use service::bank_account::BankAccountRequest;
    /// let req = BankAccountRequest { account_number: Some("123456789".into()), ..Default::default() };
    /// let err = req.into_new().unwrap_err();
    /// assert!(err.to_string().contains("accountHolderName"));
    /// ```
    pub fn into_new(self) -> Result<NewBankAccount, ServiceError> {
        match (self.account_number, self.account_holder_name, self.balance) {
            (Some(number), Some(holder), Some(balance)) => Ok(NewBankAccount::new(&number, &holder, balance)?),
            (number, holder, balance) => {
                let missing: Vec<&str> = [
                    ("accountNumber", number.is_none()),
                    ("accountHolderName", holder.is_none()),
                    ("balance", balance.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ServiceError::Validation(format!("missing required field(s): {}", missing.join(", "))))
            }
        }
    }
}

/// Account as returned to clients; `balance` is a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountResponse {
    pub id: i32,
    pub account_number: String,
    pub account_holder_name: String,
    #[serde(with = "balance_number")]
    pub balance: Decimal,
}

/// Balance as a JSON number; parsing the decimal text gives the closest `f64`,
/// so any balance within the column's precision prints back unchanged.
mod balance_number {
    use rust_decimal::Decimal;
    use serde::{ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let n: f64 = value.to_string().parse().map_err(ser::Error::custom)?;
        serializer.serialize_f64(n)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}

impl From<Model> for BankAccountResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            account_number: m.account_number,
            account_holder_name: m.account_holder_name,
            balance: m.balance,
        }
    }
}
