//! JSON API handlers under `/api/v1`

pub mod auth;
pub mod books;
pub mod health;
pub mod library;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use axum_extra::extract::CookieJar;

use crate::{error::AppError, models::Session, AppState};

/// Cookie carrying the session token for browser clients
pub const SESSION_COOKIE: &str = "session";

/// Extractor for the caller's live session.
///
/// The token is read from `Authorization: Bearer` first, then from the
/// session cookie. Requests without a usable session are rejected as a
/// missing user.
pub struct AuthenticatedUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let session = state.services.users.resolve_session(&token).await?;
        Ok(AuthenticatedUser(session))
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Routes mounted under `/api/v1`
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/lookup", get(books::get_book))
        // Personal library
        .route("/library", get(library::list_library))
        .route("/library", post(library::add_to_library))
        .route("/library/entry", get(library::fetch_from_library))
        .route("/library/entry", delete(library::remove_from_library))
        .route("/library/rating", put(library::add_rating))
}
