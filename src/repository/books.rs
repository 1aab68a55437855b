//! Books repository (read-only catalogue)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::AppResult,
    models::book::{Book, BookQuery},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards so user input only matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_by_url(&self, book_url: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, book_url, name, image_url FROM books WHERE book_url = $1",
        )
        .bind(book_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        // NULL pattern matches everything
        let pattern = query
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| format!("%{}%", escape_like(&name.to_lowercase())));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE ($1::text IS NULL OR LOWER(name) LIKE $1 ESCAPE '\\')",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, book_url, name, image_url
            FROM books
            WHERE ($1::text IS NULL OR LOWER(name) LIKE $1 ESCAPE '\')
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(query.per_page())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("dune"), "dune");
        assert_eq!(escape_like("_"), "\\_");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
