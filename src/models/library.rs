//! Library membership rows (user <-> book, with rating)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Rating given to a book when it is first added
pub const DEFAULT_RATING: i16 = 5;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Membership row linking a user to a book in their library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryEntry {
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

/// Library row joined with the book's display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryBook {
    pub book_id: i32,
    pub rating: i16,
    pub name: String,
    pub book_url: String,
    pub image_url: String,
}

/// Request naming a book by URL (add, fetch, remove)
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookUrlRequest {
    #[validate(length(min = 1, message = "book_url must not be empty"))]
    pub book_url: String,
}

/// Rating request. Values above the maximum pass validation and are
/// rejected by the service as forbidden.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RatingRequest {
    #[validate(length(min = 1, message = "book_url must not be empty"))]
    pub book_url: String,
    #[validate(range(min = 0, message = "Rating must not be negative"))]
    #[serde(deserialize_with = "saturating_rating")]
    pub rating: i64,
}

/// Rating as sent by the client: JSON number or form text
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRating {
    Int(i64),
    Big(u64),
    Float(f64),
    Text(String),
}

/// Accept any whole number, clamping out-of-range values to the i64 bounds
/// so oversized ratings still reach the range checks.
fn saturating_rating<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let whole = |value: f64| {
        if value.is_finite() && value.fract() == 0.0 {
            // `as` saturates at the i64 bounds
            Ok(value as i64)
        } else {
            Err(serde::de::Error::custom("rating must be a whole number"))
        }
    };

    match RawRating::deserialize(deserializer)? {
        RawRating::Int(value) => Ok(value),
        RawRating::Big(_) => Ok(i64::MAX),
        RawRating::Float(value) => whole(value),
        RawRating::Text(text) => {
            let text = text.trim();
            match text.parse::<i64>() {
                Ok(value) => Ok(value),
                Err(_) => text
                    .parse::<f64>()
                    .map_err(|_| serde::de::Error::custom("rating must be a whole number"))
                    .and_then(whole),
            }
        }
    }
}

/// Status object returned by mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: u16,
    pub message: String,
}

/// Result of adding a book to the library
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddedToLibrary {
    pub message: String,
    pub result: LibraryEntry,
}

/// Result of looking up one membership row; absence is not an error
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryLookup {
    pub message: String,
    pub exists: bool,
    pub result: Option<LibraryEntry>,
}

impl LibraryLookup {
    pub fn found(entry: LibraryEntry) -> Self {
        Self {
            message: "entry exists in the library".to_string(),
            exists: true,
            result: Some(entry),
        }
    }

    pub fn missing() -> Self {
        Self {
            message: "entry doesn't exist in the library".to_string(),
            exists: false,
            result: None,
        }
    }
}

/// The caller's whole library, most recently added first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryListing {
    pub message: String,
    pub result: Vec<LibraryBook>,
}
