use async_trait::async_trait;
use models::bank_account::{self, ActiveModel, Entity as BankAccountEntity, Model};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::errors::ServiceError;

/// Storage operations for bank accounts.
///
/// Every method receives the connection to run on, so the caller decides
/// whether it executes on the pool or inside an open transaction.
#[async_trait]
pub trait BankAccountRepository: Send + Sync {
    /// All rows in creation order.
    async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Model>, ServiceError>;
    async fn find_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<Option<Model>, ServiceError>;
    async fn find_by_account_number<C: ConnectionTrait>(&self, conn: &C, number: &str) -> Result<Option<Model>, ServiceError>;
    /// Inserts when `id` is unset, updates by `id` otherwise.
    async fn save<C: ConnectionTrait>(&self, conn: &C, record: ActiveModel) -> Result<Model, ServiceError>;
    /// Returns the number of deleted rows; a missing id yields 0.
    async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<u64, ServiceError>;
    async fn count<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, ServiceError>;
    async fn delete_all<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmBankAccountRepository;

#[async_trait]
impl BankAccountRepository for SeaOrmBankAccountRepository {
    async fn find_all<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Model>, ServiceError> {
        let rows = BankAccountEntity::find()
            .order_by_asc(bank_account::Column::Id)
            .all(conn)
            .await?;
        Ok(rows)
    }

    async fn find_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<Option<Model>, ServiceError> {
        let found = BankAccountEntity::find_by_id(id).one(conn).await?;
        Ok(found)
    }

    async fn find_by_account_number<C: ConnectionTrait>(&self, conn: &C, number: &str) -> Result<Option<Model>, ServiceError> {
        let found = BankAccountEntity::find()
            .filter(bank_account::Column::AccountNumber.eq(number))
            .one(conn)
            .await?;
        Ok(found)
    }

    async fn save<C: ConnectionTrait>(&self, conn: &C, record: ActiveModel) -> Result<Model, ServiceError> {
        let saved = if matches!(record.id, ActiveValue::NotSet) {
            record.insert(conn).await
        } else {
            record.update(conn).await
        };
        saved.map_err(ServiceError::from_write_err)
    }

    async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<u64, ServiceError> {
        let res = BankAccountEntity::delete_by_id(id).exec(conn).await?;
        Ok(res.rows_affected)
    }

    async fn count<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, ServiceError> {
        let n = BankAccountEntity::find().count(conn).await?;
        Ok(n)
    }

    async fn delete_all<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, ServiceError> {
        let res = BankAccountEntity::delete_many().exec(conn).await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::bank_account::NewBankAccount;
    use rust_decimal::Decimal;
    use sea_orm::TransactionTrait;

    fn record(number: &str, holder: &str, balance: i64) -> ActiveModel {
        NewBankAccount::new(number, holder, Decimal::new(balance, 2))
            .expect("valid fixture")
            .into_active_model()
    }

    #[tokio::test]
    async fn save_inserts_then_updates() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmBankAccountRepository;

        let created = repo.save(&db, record("123456789", "John Doe", 100000)).await?;
        assert!(created.id > 0);
        assert_eq!(repo.count(&db).await?, 1);

        let changed = NewBankAccount::new("123456789", "John Updated", Decimal::new(150000, 2))?.apply_to(created.clone());
        let updated = repo.save(&db, changed).await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.account_holder_name, "John Updated");
        assert_eq!(repo.count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn finders_and_ordering() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmBankAccountRepository;
        let a = repo.save(&db, record("A1", "Alice", 100)).await?;
        let b = repo.save(&db, record("B2", "Bob", 200)).await?;

        let all = repo.find_all(&db).await?;
        assert_eq!(all.iter().map(|m| m.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(repo.find_by_id(&db, b.id).await?.map(|m| m.account_number), Some("B2".to_string()));
        assert_eq!(repo.find_by_account_number(&db, "A1").await?.map(|m| m.id), Some(a.id));
        assert!(repo.find_by_id(&db, 999).await?.is_none());
        assert!(repo.find_by_account_number(&db, "nope").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_is_noop_and_delete_all_clears() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmBankAccountRepository;
        assert_eq!(repo.delete_by_id(&db, 999).await?, 0);

        let a = repo.save(&db, record("A1", "Alice", 100)).await?;
        repo.save(&db, record("B2", "Bob", 200)).await?;
        assert_eq!(repo.delete_by_id(&db, a.id).await?, 1);
        assert_eq!(repo.count(&db).await?, 1);
        assert_eq!(repo.delete_all(&db).await?, 1);
        assert_eq!(repo.count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_number_maps_to_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmBankAccountRepository;
        repo.save(&db, record("DUP", "First", 0)).await?;
        let err = repo.save(&db, record("DUP", "Second", 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn works_inside_a_transaction() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let repo = SeaOrmBankAccountRepository;
        let txn = db.begin().await?;
        repo.save(&txn, record("TX1", "In Txn", 0)).await?;
        assert_eq!(repo.count(&txn).await?, 1);
        txn.rollback().await?;
        assert_eq!(repo.count(&db).await?, 0);
        Ok(())
    }
}
