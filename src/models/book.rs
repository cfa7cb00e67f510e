//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i32>,
    /// Copies currently on the shelf; decremented on issue, incremented on return
    pub stock: i32,
    pub per_day_fee: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Create book request. `title` and `author` are required; the handler
/// rejects missing fields so the error carries the field name.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i32>,
    pub stock: Option<i32>,
    pub per_day_fee: Option<Decimal>,
}

/// Fully-resolved book ready for insertion, after required-field checks
/// and fee defaulting
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i32>,
    pub stock: i32,
    pub per_day_fee: Decimal,
}

/// Update book request; only provided fields overwrite
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub pages: Option<i32>,
    pub stock: Option<i32>,
    pub per_day_fee: Option<Decimal>,
}

/// Catalog search parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match on the title
    pub title: Option<String>,
    /// Case-insensitive substring match on the author
    pub author: Option<String>,
}
