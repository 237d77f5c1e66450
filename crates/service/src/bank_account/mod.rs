//! Bank account management: transport DTOs, repository abstraction and the
//! transactional application service.

pub mod dto;
pub mod repository;
pub mod service;

pub use dto::{BankAccountRequest, BankAccountResponse};
pub use repository::{BankAccountRepository, SeaOrmBankAccountRepository};
pub use service::BankAccountService;
