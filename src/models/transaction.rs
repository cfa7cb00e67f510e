//! Ledger transaction model and the late-fee arithmetic

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Transaction model from database. A transaction is ISSUED until
/// `returned` is set, after which it is terminal and `fee` is final.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub issue_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub returned: bool,
    pub fee: Decimal,
}

/// Ledger entry enriched with the member's name and the book's title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TransactionDetails {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub issue_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub returned: bool,
    pub fee: Decimal,
}

/// Compute the late fee for a loan held from `issued` to `returned`.
///
/// A loan is billed per whole day held, with a minimum of one day: a
/// same-day return still costs one day, and partial days are floored
/// (25 hours is one day, 49 hours is two).
pub fn late_fee(
    issued: DateTime<Utc>,
    returned: DateTime<Utc>,
    per_day_fee: Decimal,
) -> (i64, Decimal) {
    let days_held = (returned - issued).num_days().max(1);
    (days_held, Decimal::from(days_held) * per_day_fee)
}
