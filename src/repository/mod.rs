//! Repository layer for database and session storage
//!
//! Each storage concern is a trait so services can be exercised without a
//! live Postgres or Redis; the concrete implementations live in the
//! submodules.

pub mod books;
pub mod library;
pub mod sessions;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[cfg(test)]
use mockall::automock;

use crate::{
    error::AppResult,
    models::{
        user::NewUser, Book, BookQuery, LibraryBook, LibraryEntry, Session, User,
    },
};

/// Account storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Lookup is case-insensitive
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Read-only book catalogue
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_url(&self, book_url: &str) -> AppResult<Option<Book>>;

    /// Page of books plus the total match count
    async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)>;

    /// Round-trip to the database, used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Membership rows keyed by (user_id, book_id)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn find(&self, user_id: i32, book_id: i32) -> AppResult<Option<LibraryEntry>>;

    /// Fails with `Conflict` when the pair already exists
    async fn create(&self, user_id: i32, book_id: i32, rating: i16) -> AppResult<LibraryEntry>;

    /// Returns the number of rows touched (0 or 1)
    async fn update_rating(&self, user_id: i32, book_id: i32, rating: i16) -> AppResult<u64>;

    /// Returns the number of rows removed (0 or 1)
    async fn delete(&self, user_id: i32, book_id: i32) -> AppResult<u64>;

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<LibraryBook>>;
}

/// Server-side session registry
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &Session, ttl_seconds: u64) -> AppResult<()>;

    async fn get(&self, session_id: &str) -> AppResult<Option<Session>>;

    async fn delete(&self, session_id: &str) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub library: library::LibraryRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            library: library::LibraryRepository::new(pool.clone()),
            pool,
        }
    }
}
