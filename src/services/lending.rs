//! Lending ledger service

use rust_decimal::Decimal;

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::transaction::TransactionDetails,
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Issue a book to a member, returning the new transaction id
    pub async fn issue(&self, member_id: i32, book_id: i32) -> AppResult<i32> {
        self.repository
            .transactions
            .issue(member_id, book_id, self.config.debt_limit)
            .await
    }

    /// Return an issued book, returning (transaction id, days held, fee)
    pub async fn return_book(&self, transaction_id: i32) -> AppResult<(i32, i64, Decimal)> {
        self.repository
            .transactions
            .return_book(transaction_id, self.config.default_per_day_fee)
            .await
    }

    /// Full ledger, newest issue first
    pub async fn list(&self) -> AppResult<Vec<TransactionDetails>> {
        self.repository.transactions.list_all().await
    }
}
