#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};
use sea_orm::DatabaseConnection;

use crate::bank_account::{BankAccountService, SeaOrmBankAccountRepository};

/// Fresh private database per call, schema applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::sqlite_in_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn get_service() -> Result<BankAccountService<SeaOrmBankAccountRepository>, anyhow::Error> {
    let db = get_db().await?;
    Ok(BankAccountService::new(db, Arc::new(SeaOrmBankAccountRepository)))
}
