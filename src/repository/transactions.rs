//! Transactions repository: the lending ledger.
//!
//! Issue and return mutate several rows at once, so both run inside a
//! single database transaction with the affected book and user rows
//! locked (`FOR UPDATE`). Two concurrent issues against the last copy
//! of a book serialize on the book row; the second observes stock 0.

use chrono::Utc;
use rust_decimal::Decimal;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        transaction::{late_fee, Transaction, TransactionDetails},
        user::User,
    },
};

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Issue a book to a member: insert an ISSUED ledger entry and
    /// decrement the book's stock, atomically.
    pub async fn issue(&self, member_id: i32, book_id: i32, debt_limit: Decimal) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let member = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND role = 'member' FOR UPDATE",
        )
        .bind(member_id)
        .fetch_optional(&mut *tx)
        .await?;

        let stock: Option<i32> =
            sqlx::query_scalar("SELECT stock FROM books WHERE id = $1 FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (member, stock) = match (member, stock) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(AppError::NotFound("Member or Book not found".to_string())),
        };

        if stock < 1 {
            return Err(AppError::BusinessRule("Book out of stock".to_string()));
        }

        if member.debt > debt_limit {
            return Err(AppError::BusinessRule(format!(
                "Member debt exceeds {}",
                debt_limit
            )));
        }

        let transaction_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO transactions (user_id, book_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(member_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET stock = stock - 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(transaction_id)
    }

    /// Return an issued book: finalize the fee, restock the book and
    /// add the fee to the member's debt, atomically.
    pub async fn return_book(
        &self,
        transaction_id: i32,
        default_per_day_fee: Decimal,
    ) -> AppResult<(i32, i64, Decimal)> {
        let mut tx = self.pool.begin().await?;

        let txn = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 FOR UPDATE",
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Unknown id and already-returned collapse into one client error.
        let txn = match txn {
            Some(t) if !t.returned => t,
            _ => {
                return Err(AppError::NotFound(
                    "Transaction not found or already returned".to_string(),
                ))
            }
        };

        // Lock the member row before the book row, in the same order as
        // issue, so concurrent issue/return cannot deadlock.
        sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR UPDATE")
            .bind(txn.user_id)
            .execute(&mut *tx)
            .await?;

        let per_day_fee: Option<Decimal> =
            sqlx::query_scalar("SELECT per_day_fee FROM books WHERE id = $1 FOR UPDATE")
                .bind(txn.book_id)
                .fetch_one(&mut *tx)
                .await?;

        let now = Utc::now();
        let (days_held, fee) = late_fee(
            txn.issue_date,
            now,
            per_day_fee.unwrap_or(default_per_day_fee),
        );

        sqlx::query(
            "UPDATE transactions SET return_date = $1, returned = TRUE, fee = $2 WHERE id = $3",
        )
        .bind(now)
        .bind(fee)
        .bind(txn.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET stock = stock + 1 WHERE id = $1")
            .bind(txn.book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET debt = debt + $1 WHERE id = $2")
            .bind(fee)
            .bind(txn.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((txn.id, days_held, fee))
    }

    /// Full ledger, newest issue first, joined with member names and
    /// book titles.
    pub async fn list_all(&self) -> AppResult<Vec<TransactionDetails>> {
        let transactions = sqlx::query_as::<_, TransactionDetails>(
            r#"
            SELECT t.id, t.user_id, u.name AS user_name,
                   t.book_id, b.title AS book_title,
                   t.issue_date, t.return_date, t.returned, t.fee
            FROM transactions t
            JOIN users u ON t.user_id = u.id
            JOIN books b ON t.book_id = b.id
            ORDER BY t.issue_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
