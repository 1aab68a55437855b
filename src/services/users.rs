//! Sign-up, login and session service

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::rngs::OsRng;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{NewUser, Session, SessionClaims, SignUp, User},
    repository::{SessionStore, UserStore},
};

/// Issued on a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>, config: AuthConfig) -> Self {
        Self { users, sessions, config }
    }

    /// Create a new account. Fails with `Conflict` when the email is taken.
    pub async fn signup(&self, request: SignUp) -> AppResult<User> {
        request.validate().map_err(|errors| {
            AppError::Validation(
                SignUp::first_error(&errors).unwrap_or_else(|| "Invalid input".to_string()),
            )
        })?;

        if self.users.get_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists.".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                email: request.email,
                username: request.username,
                password_hash,
            })
            .await?;

        tracing::info!("Created account {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Check credentials, open a session and return its token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let invalid = || AppError::Authentication("Invalid email or password".to_string());

        let Some(user) = self.users.get_by_email(email).await? else {
            tracing::warn!("Login attempt for unknown email {}", email);
            return Err(invalid());
        };

        if !self.verify_password(&user, password)? {
            tracing::warn!("Rejected login for user {}", user.id);
            return Err(invalid());
        }

        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            email: user.email.clone(),
        };
        let ttl = self.config.session_seconds();
        self.sessions.create(&session, ttl).await?;

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.email.clone(),
            user_id: user.id,
            sid: session.id,
            exp: now.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)),
            iat: now,
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("User {} logged in", user.id);
        Ok(LoginOutcome {
            token,
            expires_in: ttl,
            user,
        })
    }

    /// Resolve a bearer token to its live session.
    ///
    /// Every failure (bad signature, expiry, revoked or unknown session) is
    /// reported as a missing user.
    pub async fn resolve_session(&self, token: &str) -> AppResult<Session> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| user_not_found())?;

        self.sessions
            .get(&claims.sid)
            .await?
            .filter(|session| session.user_id == claims.user_id)
            .ok_or_else(user_not_found)
    }

    /// Revoke the session
    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.sessions.delete(&session.id).await?;
        tracing::info!("User {} logged out", session.user_id);
        Ok(())
    }

    /// Account behind the session
    pub async fn current_user(&self, session: &Session) -> AppResult<User> {
        self.users
            .get_by_id(session.user_id)
            .await?
            .ok_or_else(user_not_found)
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}
