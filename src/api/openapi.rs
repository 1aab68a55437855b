//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, library};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Book Library API",
        version = "0.1.0",
        description = "Personal book library: accounts, book catalogue, reading list and ratings",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        // Library
        library::add_rating,
        library::add_to_library,
        library::fetch_from_library,
        library::list_library,
        library::remove_from_library,
    ),
    components(
        schemas(
            // Auth
            auth::SignUpResponse,
            auth::LoginResponse,
            crate::models::user::SignUp,
            crate::models::user::Login,
            crate::models::user::UserInfo,
            // Books
            crate::models::book::Book,
            books::PaginatedBooks,
            // Library
            crate::models::library::LibraryEntry,
            crate::models::library::LibraryBook,
            crate::models::library::BookUrlRequest,
            crate::models::library::RatingRequest,
            crate::models::library::StatusResponse,
            crate::models::library::AddedToLibrary,
            crate::models::library::LibraryLookup,
            crate::models::library::LibraryListing,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sign-up, login and sessions"),
        (name = "books", description = "Book catalogue"),
        (name = "library", description = "Personal library and ratings")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
