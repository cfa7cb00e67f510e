//! Lending ledger endpoints

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::transaction::TransactionDetails,
};

use super::{ApiResponse, Librarian};

/// Issue request
#[derive(Deserialize, ToSchema)]
pub struct IssueRequest {
    pub member_id: Option<i32>,
    pub book_id: Option<i32>,
}

/// Issue response payload
#[derive(Serialize, ToSchema)]
pub struct IssueData {
    pub transaction_id: i32,
}

/// Return request
#[derive(Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub transaction_id: Option<i32>,
}

/// Return response payload
#[derive(Serialize, ToSchema)]
pub struct ReturnData {
    pub transaction_id: i32,
    pub days_held: i64,
    pub fee: Decimal,
}

/// Issue a book to a member
#[utoipa::path(
    post,
    path = "/transactions/issue",
    tag = "transactions",
    security(("bearer_auth" = [])),
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Book issued", body = ApiResponse<IssueData>),
        (status = 400, description = "Out of stock or debt limit exceeded"),
        (status = 404, description = "Member or book not found"),
        (status = 422, description = "Missing field")
    )
)]
pub async fn issue_book(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Json(request): Json<IssueRequest>,
) -> AppResult<Json<ApiResponse<IssueData>>> {
    let (member_id, book_id) = match (request.member_id, request.book_id) {
        (Some(m), Some(b)) => (m, b),
        _ => {
            return Err(AppError::Validation(
                "Both 'member_id' and 'book_id' are required".to_string(),
            ))
        }
    };

    let transaction_id = state.services.lending.issue(member_id, book_id).await?;

    Ok(Json(ApiResponse::success(
        "Book issued successfully",
        IssueData { transaction_id },
    )))
}

/// Return an issued book
#[utoipa::path(
    post,
    path = "/transactions/return",
    tag = "transactions",
    security(("bearer_auth" = [])),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = ApiResponse<ReturnData>),
        (status = 404, description = "Transaction not found or already returned"),
        (status = 422, description = "Missing field")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ApiResponse<ReturnData>>> {
    let transaction_id = request
        .transaction_id
        .ok_or_else(|| AppError::Validation("'transaction_id' is required".to_string()))?;

    let (transaction_id, days_held, fee) =
        state.services.lending.return_book(transaction_id).await?;

    Ok(Json(ApiResponse::success(
        "Book returned successfully",
        ReturnData {
            transaction_id,
            days_held,
            fee,
        },
    )))
}

/// Full ledger, newest issue first
#[utoipa::path(
    get,
    path = "/transactions/",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All transactions", body = Vec<TransactionDetails>),
        (status = 403, description = "Librarian privileges required")
    )
)]
pub async fn list_transactions(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
) -> AppResult<Json<ApiResponse<Vec<TransactionDetails>>>> {
    let transactions = state.services.lending.list().await?;

    Ok(Json(ApiResponse::success(
        "Transactions fetched successfully",
        transactions,
    )))
}
