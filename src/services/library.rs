//! Personal library: membership rows and ratings
//!
//! Each operation resolves the book by its URL, then reads or mutates the
//! caller's membership row. Ownership is implicit: every query is keyed by
//! the session's user id.

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        library::{
            AddedToLibrary, BookUrlRequest, LibraryListing, LibraryLookup, RatingRequest,
            StatusResponse, DEFAULT_RATING, MAX_RATING,
        },
        Book, Session,
    },
    repository::{BookStore, LibraryStore},
};

#[derive(Clone)]
pub struct LibraryService {
    books: Arc<dyn BookStore>,
    library: Arc<dyn LibraryStore>,
}

impl LibraryService {
    pub fn new(books: Arc<dyn BookStore>, library: Arc<dyn LibraryStore>) -> Self {
        Self { books, library }
    }

    /// Overwrite the rating of a book already in the caller's library
    pub async fn add_rating(&self, session: &Session, request: RatingRequest) -> AppResult<StatusResponse> {
        request.validate()?;

        if request.rating > MAX_RATING {
            return Err(AppError::Forbidden("Bad rating".to_string()));
        }

        let book = self
            .book(&request.book_url, || "Book not found. Can't rate".to_string())
            .await?;

        let rating = i16::try_from(request.rating)
            .map_err(|_| AppError::Forbidden("Bad rating".to_string()))?;
        let touched = self
            .library
            .update_rating(session.user_id, book.id, rating)
            .await?;
        if touched == 0 {
            return Err(AppError::NotFound(
                "Can't add rating before adding to library".to_string(),
            ));
        }

        tracing::info!("User {} rated {} with {}", session.user_id, book.book_url, rating);
        Ok(StatusResponse {
            status: 201,
            message: "update successful".to_string(),
        })
    }

    /// Add a book to the caller's library with the default rating
    pub async fn add_to_library(&self, session: &Session, request: BookUrlRequest) -> AppResult<AddedToLibrary> {
        request.validate()?;

        let book = self.book(&request.book_url, || "Book not found".to_string()).await?;

        if self.library.find(session.user_id, book.id).await?.is_some() {
            return Err(AppError::Conflict(
                "User's library already has this book".to_string(),
            ));
        }

        let entry = self
            .library
            .create(session.user_id, book.id, DEFAULT_RATING)
            .await?;

        tracing::info!("User {} added {} to their library", session.user_id, book.book_url);
        Ok(AddedToLibrary {
            message: "created library entry".to_string(),
            result: entry,
        })
    }

    /// Whether the book is in the caller's library, and the row if so
    pub async fn fetch_from_library(&self, session: &Session, request: BookUrlRequest) -> AppResult<LibraryLookup> {
        request.validate()?;

        let book = self.book(&request.book_url, || "Book not found".to_string()).await?;

        Ok(match self.library.find(session.user_id, book.id).await? {
            Some(entry) => LibraryLookup::found(entry),
            None => LibraryLookup::missing(),
        })
    }

    /// Every book in the caller's library, most recently added first
    pub async fn list_library(&self, session: &Session) -> AppResult<LibraryListing> {
        // TODO: keyword search over the listing
        let result = self.library.list_for_user(session.user_id).await?;

        Ok(LibraryListing {
            message: "Listed all books in user library, most recent first".to_string(),
            result,
        })
    }

    /// Remove a book from the caller's library
    pub async fn remove_from_library(&self, session: &Session, request: BookUrlRequest) -> AppResult<()> {
        request.validate()?;

        let url = request.book_url;
        let book = self
            .book(&url, || format!("Book not found at the url {}", url))
            .await?;

        let removed = self.library.delete(session.user_id, book.id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "User's library doesn't have {}",
                url
            )));
        }

        tracing::info!("User {} removed {} from their library", session.user_id, url);
        Ok(())
    }

    async fn book(&self, book_url: &str, not_found: impl FnOnce() -> String) -> AppResult<Book> {
        self.books
            .find_by_url(book_url)
            .await?
            .ok_or_else(|| AppError::NotFound(not_found()))
    }
}
