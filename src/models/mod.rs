//! Data models for the book library

pub mod book;
pub mod library;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookQuery};
pub use library::{LibraryBook, LibraryEntry};
pub use user::{Session, User, UserInfo};
