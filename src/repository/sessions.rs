//! Redis-backed session registry

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{Deserialize, Serialize};

use super::SessionStore;
use crate::{
    error::{AppError, AppResult},
    models::Session,
};

/// Value stored under `session:{id}`
#[derive(Serialize, Deserialize)]
struct SessionRecord {
    user_id: i32,
    email: String,
}

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to Redis and check the connection with a PING
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;

        Ok(Self { conn })
    }

    fn key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session: &Session, ttl_seconds: u64) -> AppResult<()> {
        let record = serde_json::to_string(&SessionRecord {
            user_id: session.user_id,
            email: session.email.clone(),
        })
        .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(&session.id), record, ttl_seconds)
            .await?;

        Ok(())
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<Session>> {
        let mut conn = self.conn.clone();
        let stored: Option<String> = conn.get(Self::key(session_id)).await?;

        let Some(stored) = stored else {
            return Ok(None);
        };

        // An unreadable record is treated as an expired session
        match serde_json::from_str::<SessionRecord>(&stored) {
            Ok(record) => Ok(Some(Session {
                id: session_id.to_string(),
                user_id: record.user_id,
                email: record.email,
            })),
            Err(e) => {
                tracing::warn!("Discarding malformed session {}: {}", session_id, e);
                Ok(None)
            }
        }
    }

    async fn delete(&self, session_id: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(session_id)).await?;
        Ok(())
    }
}
