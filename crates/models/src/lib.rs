pub mod errors;
pub mod db;
pub mod bank_account;

#[cfg(test)]
mod tests;
