//! Account and session endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::user::{Login, SignUp, UserInfo},
};

use super::AuthenticatedUser;

/// Sign-up result
#[derive(Serialize, ToSchema)]
pub struct SignUpResponse {
    pub status: u16,
    pub message: String,
    /// Email of the created account
    pub result: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Session lifetime in seconds
    pub expires_in: u64,
    pub user: UserInfo,
}

/// Create an account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignUp,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SignUp>, AppError>,
) -> AppResult<(StatusCode, Json<SignUpResponse>)> {
    let user = state.services.users.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            status: StatusCode::CREATED.as_u16(),
            message: "Account created successfully".to_string(),
            result: user.email,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = Login,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<Login>, AppError>,
) -> AppResult<Json<LoginResponse>> {
    let outcome = state
        .services
        .users
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: outcome.expires_in,
        user: outcome.user.into(),
    }))
}

/// Close the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "No session", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.users.logout(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged-in user", body = UserInfo),
        (status = 404, description = "No session", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> AppResult<Json<UserInfo>> {
    let user = state.services.users.current_user(&session).await?;
    Ok(Json(user.into()))
}
