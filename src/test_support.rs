//! In-memory stores and helpers for router tests

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::Utc;
use tower::ServiceExt;

use crate::{
    config::{AppConfig, AuthConfig},
    error::{AppError, AppResult},
    models::{
        user::{NewUser, SessionClaims}, Book, BookQuery, LibraryBook, LibraryEntry, Session, User,
    },
    repository::{BookStore, LibraryStore, SessionStore, UserStore},
    services::Services,
    AppState,
};

#[derive(Default)]
pub struct MemoryUsers(Mutex<Vec<User>>);

#[async_trait]
impl UserStore for MemoryUsers {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.0.lock().unwrap();
        let created = User {
            id: users.len() as i32 + 1,
            email: user.email,
            username: user.username,
            password: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

pub struct MemoryBooks(Vec<Book>);

impl Default for MemoryBooks {
    fn default() -> Self {
        Self(vec![
            Book {
                id: 1,
                book_url: "dune".to_string(),
                name: "Dune".to_string(),
                image_url: "https://img/dune.jpg".to_string(),
            },
            Book {
                id: 2,
                book_url: "the-hobbit".to_string(),
                name: "The Hobbit".to_string(),
                image_url: "https://img/hobbit.jpg".to_string(),
            },
        ])
    }
}

#[async_trait]
impl BookStore for MemoryBooks {
    async fn find_by_url(&self, book_url: &str) -> AppResult<Option<Book>> {
        Ok(self.0.iter().find(|b| b.book_url == book_url).cloned())
    }

    async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let matching: Vec<Book> = self
            .0
            .iter()
            .filter(|b| match &query.name {
                Some(name) => b.name.to_lowercase().contains(&name.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.per_page() as usize)
            .collect();
        Ok((page, total))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Rows in insertion order
#[derive(Default)]
pub struct MemoryLibrary {
    books: MemoryBooks,
    rows: Mutex<Vec<LibraryEntry>>,
}

#[async_trait]
impl LibraryStore for MemoryLibrary {
    async fn find(&self, user_id: i32, book_id: i32) -> AppResult<Option<LibraryEntry>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.book_id == book_id)
            .cloned())
    }

    async fn create(&self, user_id: i32, book_id: i32, rating: i16) -> AppResult<LibraryEntry> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.user_id == user_id && r.book_id == book_id) {
            return Err(AppError::Conflict("User's library already has this book".to_string()));
        }
        let entry = LibraryEntry {
            user_id,
            book_id,
            rating,
            created_at: Utc::now(),
        };
        rows.push(entry.clone());
        Ok(entry)
    }

    async fn update_rating(&self, user_id: i32, book_id: i32, rating: i16) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut touched = 0;
        for row in rows.iter_mut().filter(|r| r.user_id == user_id && r.book_id == book_id) {
            row.rating = rating;
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete(&self, user_id: i32, book_id: i32) -> AppResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.user_id == user_id && r.book_id == book_id));
        Ok((before - rows.len()) as u64)
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<LibraryBook>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                self.books.0.iter().find(|b| b.id == r.book_id).map(|b| LibraryBook {
                    book_id: b.id,
                    rating: r.rating,
                    name: b.name.clone(),
                    book_url: b.book_url.clone(),
                    image_url: b.image_url.clone(),
                })
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MemorySessions(Mutex<HashMap<String, Session>>);

#[async_trait]
impl SessionStore for MemorySessions {
    async fn create(&self, session: &Session, _ttl_seconds: u64) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<Session>> {
        Ok(self.0.lock().unwrap().get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> AppResult<()> {
        self.0.lock().unwrap().remove(session_id);
        Ok(())
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        session_hours: 1,
    }
}

/// Router over the given user store and in-memory everything else
pub fn app_with_users(users: Arc<dyn UserStore>) -> Router {
    app_with_stores(users, Arc::new(MemorySessions::default()))
}

/// Router over the given user and session stores
pub fn app_with_stores(users: Arc<dyn UserStore>, sessions: Arc<dyn SessionStore>) -> Router {
    let services = Services::from_stores(
        users,
        Arc::new(MemoryBooks::default()),
        Arc::new(MemoryLibrary::default()),
        sessions,
        auth_config(),
    );
    let config = AppConfig {
        auth: auth_config(),
        ..Default::default()
    };
    crate::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

/// Router over in-memory stores only
pub fn app() -> Router {
    app_with_users(Arc::new(MemoryUsers::default()))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Token for a session the store has never seen
pub fn token_for(user_id: i32, session_id: &str) -> String {
    let now = Utc::now().timestamp();
    SessionClaims {
        sub: "ada@example.com".to_string(),
        user_id,
        sid: session_id.to_string(),
        exp: now + 3600,
        iat: now,
    }
    .create_token(&auth_config().jwt_secret)
    .unwrap()
}

/// Sign up and log in through the JSON API, returning the bearer token
pub async fn signed_in(app: &Router, email: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/signup",
            None,
            serde_json::json!({ "username": "reader", "email": email, "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(response.status(), 201);

    let response = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "email": email, "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["token"].as_str().unwrap().to_string()
}
