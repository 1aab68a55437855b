//! User model, sign-up schema and session claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new account, password already hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Sign-up request, shared by the JSON endpoint and the HTML form
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SignUp {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[serde(default)]
    pub password: String,
}

const PASSWORD_MIN: usize = 4;
const PASSWORD_MAX: usize = 12;

fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    let message = if len < PASSWORD_MIN {
        format!("Password must contain at least {} character(s)", PASSWORD_MIN)
    } else if len > PASSWORD_MAX {
        format!("Password must contain at most {} character(s)", PASSWORD_MAX)
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("length");
    err.message = Some(Cow::Owned(message));
    Err(err)
}

impl SignUp {
    /// Fields in the order they appear on the form
    pub const FIELDS: [&'static str; 3] = ["username", "email", "password"];

    /// Message of the first invalid field, in form order
    pub fn first_error(errors: &ValidationErrors) -> Option<String> {
        Self::FIELDS
            .iter()
            .find_map(|field| field_message(errors, field))
    }
}

/// First validation message attached to `field`, if any
pub fn field_message(errors: &ValidationErrors, field: &str) -> Option<String> {
    errors
        .field_errors()
        .get(field)
        .and_then(|errs| errs.first())
        .and_then(|e| e.message.as_ref())
        .map(|m| m.to_string())
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Public view of the logged-in user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub email: String,
    pub username: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

/// JWT claims referencing a server-side session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User email
    pub sub: String,
    pub user_id: i32,
    /// Session id, key of the Redis entry backing this token
    pub sid: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Resolved session: who is calling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: i32,
    pub email: String,
}
