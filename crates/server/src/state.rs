use std::sync::Arc;

use service::bank_account::{BankAccountService, SeaOrmBankAccountRepository};

pub type AccountService = BankAccountService<SeaOrmBankAccountRepository>;

/// Shared handler state; cloning only bumps the reference count.
#[derive(Clone)]
pub struct ServerState {
    pub accounts: Arc<AccountService>,
}

impl ServerState {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts: Arc::new(accounts) }
    }
}
