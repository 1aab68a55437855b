//! Book catalogue endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookUrlQuery},
};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(PaginatedBooks = PaginatedResponse<Book>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Browse books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = PaginatedBooks)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, AppError>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let (items, total) = state.services.books.search(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page(),
        per_page: query.per_page(),
    }))
}

/// Get a book by its URL
#[utoipa::path(
    get,
    path = "/books/lookup",
    tag = "books",
    params(BookUrlQuery),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BookUrlQuery>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_url(&query.book_url).await?;
    Ok(Json(book))
}
