//! Business logic services

pub mod books;
pub mod library;
pub mod users;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    repository::{BookStore, LibraryStore, Repository, SessionStore, UserStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub library: library::LibraryService,
}

impl Services {
    /// Wire services over the Postgres repository and a session store
    pub fn new(repository: Repository, sessions: Arc<dyn SessionStore>, auth_config: AuthConfig) -> Self {
        Self::from_stores(
            Arc::new(repository.users),
            Arc::new(repository.books),
            Arc::new(repository.library),
            sessions,
            auth_config,
        )
    }

    /// Wire services over arbitrary store implementations
    pub fn from_stores(
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        library: Arc<dyn LibraryStore>,
        sessions: Arc<dyn SessionStore>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            users: users::UsersService::new(users, sessions, auth_config),
            books: books::BooksService::new(books.clone()),
            library: library::LibraryService::new(books, library),
        }
    }
}
