//! Redis Streams destination.
//!
//! Each route appends to its stream with `XADD <channel> MAXLEN ~ <n> * body <message>`.
//! Routes that share a connection string share one lazily opened
//! [`ConnectionManager`].

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::batch::EventBatch;
use crate::destination::EventDestination;
use crate::error::{EventError, EventResult};

/// Stream entry field holding the serialized message.
pub const BODY_FIELD: &str = "body";

/// A Redis client whose connection is opened on first use.
pub struct LazyConnection {
    client: redis::Client,
    manager: OnceCell<ConnectionManager>,
}

impl LazyConnection {
    /// Validates the URL without connecting.
    pub fn open(url: &str) -> EventResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| EventError::InvalidConfig(format!("invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            manager: OnceCell::new(),
        })
    }

    async fn connection(&self) -> EventResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(manager.clone())
    }
}

/// Connections keyed by connection string, shared across routes.
#[derive(Default)]
pub struct RedisConnections {
    by_url: HashMap<String, Arc<LazyConnection>>,
}

impl RedisConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_open(&mut self, url: &str) -> EventResult<Arc<LazyConnection>> {
        if let Some(existing) = self.by_url.get(url) {
            return Ok(Arc::clone(existing));
        }

        let connection = Arc::new(LazyConnection::open(url)?);
        self.by_url.insert(url.to_string(), Arc::clone(&connection));
        Ok(connection)
    }

    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}

pub struct RedisStreamDestination {
    connection: Arc<LazyConnection>,
    channel: String,
    max_len: usize,
}

impl RedisStreamDestination {
    pub fn new(connection: Arc<LazyConnection>, channel: impl Into<String>, max_len: usize) -> Self {
        Self {
            connection,
            channel: channel.into(),
            max_len,
        }
    }
}

#[async_trait]
impl EventDestination for RedisStreamDestination {
    fn channel(&self) -> &str {
        &self.channel
    }

    async fn send_batch(&self, batch: EventBatch) -> EventResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection.connection().await?;
        let mut pipe = redis::pipe();

        for message in batch.messages() {
            pipe.cmd("XADD")
                .arg(&self.channel)
                .arg("MAXLEN")
                .arg("~")
                .arg(self.max_len)
                .arg("*")
                .arg(BODY_FIELD)
                .arg(message);
        }

        let ids: Vec<String> = pipe.query_async(&mut conn).await?;

        debug!(
            channel = %self.channel,
            count = ids.len(),
            bytes = batch.size_bytes(),
            "Appended batch to stream"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_are_shared_per_url() {
        let mut connections = RedisConnections::new();

        let a = connections.get_or_open("redis://localhost:6379").unwrap();
        let b = connections.get_or_open("redis://localhost:6379").unwrap();
        let c = connections.get_or_open("redis://localhost:6380").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(connections.len(), 2);
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let mut connections = RedisConnections::new();
        let result = connections.get_or_open("not a url");

        assert!(matches!(result, Err(EventError::InvalidConfig(_))));
        assert!(connections.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_connect() {
        // Nothing listens on port 1; an attempted connection would fail.
        let connection = Arc::new(LazyConnection::open("redis://127.0.0.1:1").unwrap());
        let destination = RedisStreamDestination::new(connection, "outlay", 100);

        destination.send_batch(EventBatch::new(1024)).await.unwrap();
    }
}
