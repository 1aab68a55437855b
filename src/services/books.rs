//! Book catalogue service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    books: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.books.search(query).await
    }

    pub async fn get_by_url(&self, book_url: &str) -> AppResult<Book> {
        self.books
            .find_by_url(book_url)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found at the url {}", book_url)))
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.books.ping().await
    }
}
