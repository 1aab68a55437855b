//! Browser pages: login entry point, sign-up form, library and catalogue
//!
//! Pages reuse the same services as the JSON API. The session token lives
//! in an HTTP-only cookie set at login.

pub mod html;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    api::{AuthenticatedUser, SESSION_COOKIE},
    error::AppError,
    models::{
        library::{BookUrlRequest, RatingRequest},
        user::{field_message, Login, SignUp},
        BookQuery, Session,
    },
    AppState,
};

use html::SignUpView;

/// Page routes, mounted at the root
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/sign-up", get(sign_up_form).post(sign_up))
        .route("/unauthorized", get(unauthorized))
        .route("/books", get(books))
        .route("/library", get(library))
        .route("/library/add", post(add_to_library))
        .route("/library/remove", post(remove_from_library))
        .route("/library/rate", post(rate))
}

/// Login entry point; logged-in visitors go straight to their library
async fn home(user: Result<AuthenticatedUser, AppError>) -> Response {
    match user {
        Ok(_) => Redirect::to("/library").into_response(),
        Err(AppError::NotFound(_)) => Html(html::login_page("", None)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<Login>) -> Response {
    match state.services.users.login(&form.email, &form.password).await {
        Ok(outcome) => {
            let cookie = Cookie::build((SESSION_COOKIE, outcome.token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), Redirect::to("/library")).into_response()
        }
        Err(err) => page_error(err, |msg| html::login_page(&form.email, Some(msg))),
    }
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    user: Result<AuthenticatedUser, AppError>,
) -> Response {
    match user {
        Ok(AuthenticatedUser(session)) => {
            if let Err(err) = state.services.users.logout(&session).await {
                return err.into_response();
            }
        }
        Err(AppError::NotFound(_)) => {}
        Err(err) => return err.into_response(),
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/")).into_response()
}

async fn sign_up_form() -> Html<String> {
    Html(html::sign_up_page(&SignUpView::default()))
}

/// Validate the form locally; only a valid form reaches the sign-up procedure
async fn sign_up(State(state): State<AppState>, Form(form): Form<SignUp>) -> Response {
    let mut view = SignUpView {
        username: form.username.clone(),
        email: form.email.clone(),
        ..Default::default()
    };

    if let Err(errors) = form.validate() {
        view.username_error = field_message(&errors, "username");
        view.email_error = field_message(&errors, "email");
        view.password_error = field_message(&errors, "password");
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(html::sign_up_page(&view))).into_response();
    }

    match state.services.users.signup(form).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => page_error(err, |msg| {
            view.server_error = Some(msg.to_string());
            html::sign_up_page(&view)
        }),
    }
}

async fn unauthorized() -> (StatusCode, Html<String>) {
    (StatusCode::UNAUTHORIZED, Html(html::unauthorized_page()))
}

async fn books(State(state): State<AppState>) -> Response {
    match state.services.books.search(&BookQuery::default()).await {
        Ok((books, _)) => Html(html::books_page(&books)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn library(State(state): State<AppState>, user: Result<AuthenticatedUser, AppError>) -> Response {
    let session = match require_session(user) {
        Ok(session) => session,
        Err(response) => return response,
    };
    render_library(&state, &session, None).await
}

async fn add_to_library(
    State(state): State<AppState>,
    user: Result<AuthenticatedUser, AppError>,
    Form(form): Form<BookUrlRequest>,
) -> Response {
    let session = match require_session(user) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let result = state.services.library.add_to_library(&session, form).await;
    after_mutation(&state, &session, result.map(|_| ())).await
}

async fn remove_from_library(
    State(state): State<AppState>,
    user: Result<AuthenticatedUser, AppError>,
    Form(form): Form<BookUrlRequest>,
) -> Response {
    let session = match require_session(user) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let result = state.services.library.remove_from_library(&session, form).await;
    after_mutation(&state, &session, result).await
}

async fn rate(
    State(state): State<AppState>,
    user: Result<AuthenticatedUser, AppError>,
    Form(form): Form<RatingRequest>,
) -> Response {
    let session = match require_session(user) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let result = state.services.library.add_rating(&session, form).await;
    after_mutation(&state, &session, result.map(|_| ())).await
}

/// The caller's session, or the response to send instead: a redirect to the
/// unauthorized page when there is none, the error itself when the session
/// store failed.
fn require_session(user: Result<AuthenticatedUser, AppError>) -> Result<Session, Response> {
    match user {
        Ok(AuthenticatedUser(session)) => Ok(session),
        Err(AppError::NotFound(_)) => Err(Redirect::to("/unauthorized").into_response()),
        Err(err) => Err(err.into_response()),
    }
}

/// Back to the library on success, library with a banner on failure
async fn after_mutation(state: &AppState, session: &Session, result: Result<(), AppError>) -> Response {
    match result {
        Ok(()) => Redirect::to("/library").into_response(),
        Err(err) => {
            let (status, _) = err.status();
            let mut response = render_library(state, session, Some(err.public_message())).await;
            if response.status().is_success() {
                *response.status_mut() = status;
            }
            response
        }
    }
}

async fn render_library(state: &AppState, session: &Session, error: Option<String>) -> Response {
    let user = match state.services.users.current_user(session).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };
    match state.services.library.list_library(session).await {
        Ok(listing) => Html(html::library_page(&user.username, &listing.result, error.as_deref()))
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render a page carrying the failure's message; internal failures keep
/// their generic message.
fn page_error(err: AppError, render: impl FnOnce(&str) -> String) -> Response {
    let (status, _) = err.status();
    let message = err.public_message();
    (status, Html(render(&message))).into_response()
}
