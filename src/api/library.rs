//! Personal library endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::library::{
        AddedToLibrary, BookUrlRequest, LibraryListing, LibraryLookup, RatingRequest,
        StatusResponse,
    },
};

use super::AuthenticatedUser;

/// Rate a book already in the library
#[utoipa::path(
    put,
    path = "/library/rating",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating stored", body = StatusResponse),
        (status = 400, description = "Malformed or negative rating", body = crate::error::ErrorResponse),
        (status = 403, description = "Rating above 5", body = crate::error::ErrorResponse),
        (status = 404, description = "No session, unknown book or book not in library", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_rating(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Json(request), _): WithRejection<Json<RatingRequest>, AppError>,
) -> AppResult<Json<StatusResponse>> {
    let status = state.services.library.add_rating(&session, request).await?;
    Ok(Json(status))
}

/// Add a book to the library
#[utoipa::path(
    post,
    path = "/library",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = BookUrlRequest,
    responses(
        (status = 201, description = "Entry created", body = AddedToLibrary),
        (status = 404, description = "No session or unknown book", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already in library", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_to_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Json(request), _): WithRejection<Json<BookUrlRequest>, AppError>,
) -> AppResult<(StatusCode, Json<AddedToLibrary>)> {
    let added = state.services.library.add_to_library(&session, request).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// Look up one library entry
#[utoipa::path(
    get,
    path = "/library/entry",
    tag = "library",
    security(("bearer_auth" = [])),
    params(BookUrlRequest),
    responses(
        (status = 200, description = "Whether the entry exists", body = LibraryLookup),
        (status = 404, description = "No session or unknown book", body = crate::error::ErrorResponse)
    )
)]
pub async fn fetch_from_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Query(request), _): WithRejection<Query<BookUrlRequest>, AppError>,
) -> AppResult<Json<LibraryLookup>> {
    let lookup = state.services.library.fetch_from_library(&session, request).await?;
    Ok(Json(lookup))
}

/// List the library, most recently added first
#[utoipa::path(
    get,
    path = "/library",
    tag = "library",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library entries with book details", body = LibraryListing),
        (status = 404, description = "No session", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<LibraryListing>> {
    let listing = state.services.library.list_library(&session).await?;
    Ok(Json(listing))
}

/// Remove a book from the library
#[utoipa::path(
    delete,
    path = "/library/entry",
    tag = "library",
    security(("bearer_auth" = [])),
    params(BookUrlRequest),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "No session, unknown book or book not in library", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_from_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    WithRejection(Query(request), _): WithRejection<Query<BookUrlRequest>, AppError>,
) -> AppResult<StatusCode> {
    state.services.library.remove_from_library(&session, request).await?;
    Ok(StatusCode::NO_CONTENT)
}
