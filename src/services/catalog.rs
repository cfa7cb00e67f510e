//! Catalog management service

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, NewBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: LendingConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Search the catalog
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn add_book(&self, book: CreateBook) -> AppResult<i32> {
        let title = required_field(book.title.as_deref(), "title")?;
        let author = required_field(book.author.as_deref(), "author")?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, None).await? {
                return Err(AppError::Conflict(
                    "Book already exists with this ISBN".to_string(),
                ));
            }
        }

        let new_book = NewBook {
            title: title.to_string(),
            author: author.to_string(),
            isbn: book.isbn,
            publisher: book.publisher,
            pages: book.pages,
            stock: book.stock.unwrap_or(1),
            per_day_fee: book.per_day_fee.unwrap_or(self.config.default_per_day_fee),
        };

        self.repository.books.create(&new_book).await
    }

    /// Update a book; only provided fields overwrite
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;

        if let Some(ref isbn) = update.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Book already exists with this ISBN".to_string(),
                ));
            }
        }

        self.repository.books.update(id, &update).await
    }

    /// Delete a book from the catalog
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}

fn required_field<'a>(value: Option<&'a str>, name: &str) -> AppResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("'{}' is required", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_rejects_missing_and_blank() {
        assert!(required_field(None, "title").is_err());
        assert!(required_field(Some("   "), "title").is_err());
        assert_eq!(required_field(Some("Dune"), "title").unwrap(), "Dune");
    }
}
