use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};

use super::dto::{BankAccountRequest, BankAccountResponse};
use super::repository::BankAccountRepository;
use crate::errors::ServiceError;

const ENTITY: &str = "bank_account";

/// Application service for bank accounts.
///
/// Requests are validated before any storage access. Each mutating operation
/// runs in its own transaction; an early return drops the transaction, which
/// rolls it back.
pub struct BankAccountService<R: BankAccountRepository> {
    db: DatabaseConnection,
    repo: Arc<R>,
}

impl<R: BankAccountRepository> BankAccountService<R> {
    pub fn new(db: DatabaseConnection, repo: Arc<R>) -> Self { Self { db, repo } }

    pub fn connection(&self) -> &DatabaseConnection { &self.db }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    #[instrument(skip(self, request))]
    pub async fn create_account(&self, request: BankAccountRequest) -> Result<BankAccountResponse, ServiceError> {
        let fields = request.into_new()?;

        let txn = self.db.begin().await?;
        if self.repo.find_by_account_number(&txn, &fields.account_number).await?.is_some() {
            return Err(ServiceError::duplicate_account_number(&fields.account_number));
        }
        let saved = self.repo.save(&txn, fields.into_active_model()).await?;
        txn.commit().await?;

        info!(id = saved.id, account_number = %saved.account_number, "account_created");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn get_all_accounts(&self) -> Result<Vec<BankAccountResponse>, ServiceError> {
        let rows = self.repo.find_all(&self.db).await?;
        debug!(count = rows.len(), "accounts_listed");
        Ok(rows.into_iter().map(BankAccountResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_account_by_id(&self, id: i32) -> Result<BankAccountResponse, ServiceError> {
        self.repo
            .find_by_id(&self.db, id)
            .await?
            .map(BankAccountResponse::from)
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Replaces all three business fields of an existing account.
    #[instrument(skip(self, request))]
    pub async fn update_account(&self, id: i32, request: BankAccountRequest) -> Result<BankAccountResponse, ServiceError> {
        let fields = request.into_new()?;

        let txn = self.db.begin().await?;
        let Some(existing) = self.repo.find_by_id(&txn, id).await? else {
            return Err(ServiceError::not_found(ENTITY, id));
        };
        if let Some(owner) = self.repo.find_by_account_number(&txn, &fields.account_number).await? {
            if owner.id != id {
                return Err(ServiceError::duplicate_account_number(&fields.account_number));
            }
        }
        let saved = self.repo.save(&txn, fields.apply_to(existing)).await?;
        txn.commit().await?;

        info!(id = saved.id, "account_updated");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        if self.repo.find_by_id(&txn, id).await?.is_none() {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        self.repo.delete_by_id(&txn, id).await?;
        txn.commit().await?;

        info!(id, "account_deleted");
        Ok(())
    }
}
