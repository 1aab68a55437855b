//! Library membership repository (`user_books` table)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::LibraryStore;
use crate::{
    error::{AppError, AppResult},
    models::library::{LibraryBook, LibraryEntry},
};

#[derive(Clone)]
pub struct LibraryRepository {
    pool: Pool<Postgres>,
}

impl LibraryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStore for LibraryRepository {
    async fn find(&self, user_id: i32, book_id: i32) -> AppResult<Option<LibraryEntry>> {
        let entry = sqlx::query_as::<_, LibraryEntry>(
            r#"
            SELECT user_id, book_id, rating, created_at
            FROM user_books
            WHERE user_id = $1 AND book_id = $2
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn create(&self, user_id: i32, book_id: i32, rating: i16) -> AppResult<LibraryEntry> {
        sqlx::query_as::<_, LibraryEntry>(
            r#"
            INSERT INTO user_books (user_id, book_id, rating)
            VALUES ($1, $2, $3)
            RETURNING user_id, book_id, rating, created_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                AppError::Conflict("User's library already has this book".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn update_rating(&self, user_id: i32, book_id: i32, rating: i16) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE user_books SET rating = $3 WHERE user_id = $1 AND book_id = $2",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(rating)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: i32, book_id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_books WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<LibraryBook>> {
        let rows = sqlx::query_as::<_, LibraryBook>(
            r#"
            SELECT ub.book_id, ub.rating, b.name, b.book_url, b.image_url
            FROM user_books ub
            JOIN books b ON b.id = ub.book_id
            WHERE ub.user_id = $1
            ORDER BY ub.created_at DESC, ub.book_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
