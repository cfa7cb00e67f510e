//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::{ApiResponse, Librarian};

/// Payload carrying only a book id
#[derive(Serialize, ToSchema)]
pub struct BookIdData {
    pub id: i32,
}

/// Search the catalog. Public: no token required.
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<ApiResponse<Vec<Book>>>> {
    let books = state.services.catalog.search_books(&query).await?;

    Ok(Json(ApiResponse::success(
        "Books fetched successfully",
        books,
    )))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = ApiResponse<BookIdData>),
        (status = 403, description = "Librarian privileges required"),
        (status = 409, description = "ISBN already registered"),
        (status = 422, description = "Missing required field")
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookIdData>>)> {
    let id = state.services.catalog.add_book(book).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Book added successfully",
            BookIdData { id },
        )),
    ))
}

/// Update a book; only provided fields overwrite
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<BookIdData>),
        (status = 404, description = "Book not found"),
        (status = 409, description = "ISBN already registered")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Path(id): Path<i32>,
    Json(update): Json<UpdateBook>,
) -> AppResult<Json<ApiResponse<BookIdData>>> {
    let book = state.services.catalog.update_book(id, update).await?;

    Ok(Json(ApiResponse::success(
        "Book updated successfully",
        BookIdData { id: book.id },
    )))
}

/// Delete a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = ApiResponse<BookIdData>),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Book still referenced by the ledger")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Librarian(_claims): Librarian,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookIdData>>> {
    state.services.catalog.delete_book(id).await?;

    Ok(Json(ApiResponse::success(
        "Book deleted successfully",
        BookIdData { id },
    )))
}
