use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::batch::EventBatch;
use crate::config::EventRouteConfig;
use crate::destination::EventDestination;
use crate::error::{EventError, EventResult};
use crate::redis_stream::{RedisConnections, RedisStreamDestination};
use crate::route_table::RouteTable;

/// Hands a serialized message to the destination configured for an event.
#[async_trait]
pub trait EventForwarder: Send + Sync {
    async fn send(&self, event_name: &str, message: &str) -> EventResult<()>;
}

/// Forwarder bound to a route table of real destinations.
pub struct RoutedEventForwarder {
    routes: RouteTable,
    max_batch_bytes: usize,
}

impl RoutedEventForwarder {
    pub fn new(routes: RouteTable, max_batch_bytes: usize) -> Self {
        Self {
            routes,
            max_batch_bytes,
        }
    }

    /// Route table of Redis Streams destinations. Fails on missing,
    /// empty or invalid routes.
    pub fn from_config(config: &EventRouteConfig) -> EventResult<Self> {
        let entries = config.resolve_routes()?;
        let mut connections = RedisConnections::new();

        let routes = RouteTable::from_routes(entries, |entry| {
            let connection = connections.get_or_open(&entry.destination_connection)?;
            let destination: Arc<dyn EventDestination> = Arc::new(RedisStreamDestination::new(
                connection,
                entry.destination_channel.clone(),
                config.stream_max_len,
            ));
            Ok(destination)
        })?;

        info!(
            routes = routes.len(),
            connections = connections.len(),
            event_names = ?routes.event_names(),
            "Event routes loaded"
        );

        Ok(Self::new(routes, config.max_batch_bytes))
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

#[async_trait]
impl EventForwarder for RoutedEventForwarder {
    async fn send(&self, event_name: &str, message: &str) -> EventResult<()> {
        let destination = self
            .routes
            .get(event_name)
            .ok_or_else(|| EventError::RouteNotFound(event_name.to_string()))?;

        let mut batch = EventBatch::new(self.max_batch_bytes);
        if !batch.try_add(message) {
            warn!(
                event_name = %event_name,
                size = message.len(),
                limit = self.max_batch_bytes,
                "Message does not fit in an outbound batch"
            );
            return Err(EventError::MessageTooLarge {
                size: message.len(),
                limit: self.max_batch_bytes,
            });
        }

        destination.send_batch(batch).await.map_err(|e| {
            error!(
                event_name = %event_name,
                channel = %destination.channel(),
                error = %e,
                "Failed to send event"
            );
            e
        })
    }
}

/// Accepts every send, logs it and succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventForwarder;

#[async_trait]
impl EventForwarder for NoOpEventForwarder {
    async fn send(&self, event_name: &str, message: &str) -> EventResult<()> {
        info!(
            event_name = %event_name,
            payload = %message,
            "[NoOp] Event forwarding disabled, event not sent"
        );
        Ok(())
    }
}

/// Picks the forwarder once at startup: routed when the route configuration
/// is usable, no-op otherwise.
pub fn build_forwarder(config: &EventRouteConfig) -> Arc<dyn EventForwarder> {
    match RoutedEventForwarder::from_config(config) {
        Ok(forwarder) => Arc::new(forwarder),
        Err(e) => {
            warn!(error = %e, "Event routes missing or invalid, using no-op forwarder");
            Arc::new(NoOpEventForwarder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteEntry;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDestination {
        channel: String,
        batches: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl RecordingDestination {
        fn new(channel: &str) -> Arc<Self> {
            Arc::new(Self {
                channel: channel.to_string(),
                ..Default::default()
            })
        }

        fn failing(channel: &str) -> Arc<Self> {
            Arc::new(Self {
                channel: channel.to_string(),
                fail: true,
                ..Default::default()
            })
        }

        fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventDestination for RecordingDestination {
        fn channel(&self) -> &str {
            &self.channel
        }

        async fn send_batch(&self, batch: EventBatch) -> EventResult<()> {
            if self.fail {
                return Err(EventError::Transport("connection refused".into()));
            }
            self.batches.lock().unwrap().push(batch.into_messages());
            Ok(())
        }
    }

    fn forwarder_with(routes: &[(&str, Arc<RecordingDestination>)], limit: usize) -> RoutedEventForwarder {
        let mut table = RouteTable::new();
        for (name, destination) in routes {
            table.insert(*name, destination.clone() as Arc<dyn EventDestination>);
        }
        RoutedEventForwarder::new(table, limit)
    }

    #[tokio::test]
    async fn test_send_submits_exactly_one_batch_to_matching_route() {
        let orders = RecordingDestination::new("orders");
        let audit = RecordingDestination::new("audit");
        let forwarder = forwarder_with(&[("Orders", orders.clone()), ("Audit", audit.clone())], 1024);

        forwarder.send("Orders", r#"{"id":7}"#).await.unwrap();

        assert_eq!(orders.batches(), vec![vec![r#"{"id":7}"#.to_string()]]);
        assert!(audit.batches().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_event_fails_without_submission() {
        let orders = RecordingDestination::new("orders");
        let forwarder = forwarder_with(&[("Orders", orders.clone())], 1024);

        let err = forwarder.send("Missing", "{}").await.unwrap_err();

        assert!(matches!(err, EventError::RouteNotFound(name) if name == "Missing"));
        assert!(orders.batches().is_empty());
    }

    #[tokio::test]
    async fn test_oversize_message_fails_without_submission() {
        let orders = RecordingDestination::new("orders");
        let forwarder = forwarder_with(&[("Orders", orders.clone())], 8);

        let err = forwarder.send("Orders", r#"{"too":"large"}"#).await.unwrap_err();

        assert!(matches!(err, EventError::MessageTooLarge { size: 15, limit: 8 }));
        assert!(orders.batches().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let broken = RecordingDestination::failing("orders");
        let forwarder = forwarder_with(&[("Orders", broken)], 1024);

        let err = forwarder.send("Orders", "{}").await.unwrap_err();
        assert!(matches!(err, EventError::Transport(_)));
    }

    #[tokio::test]
    async fn test_noop_always_succeeds() {
        let forwarder = NoOpEventForwarder;
        forwarder.send("Anything", r#"{"a":1}"#).await.unwrap();
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_noop_logs_event_and_payload_as_fields() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        NoOpEventForwarder
            .send("Anything", r#"{"a":1}"#)
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let line: serde_json::Value =
            serde_json::from_str(output.lines().next().unwrap()).unwrap();
        let fields = &line["fields"];
        assert_eq!(fields["event_name"], "Anything");
        assert_eq!(fields["payload"], r#"{"a":1}"#);
        assert!(!fields["message"].as_str().unwrap().contains("Anything"));
    }

    #[test]
    fn test_from_config_shares_connections_and_applies_last_write() {
        let config = EventRouteConfig {
            routes: crate::config::RouteSettings::Loaded {
                source: crate::config::RouteSource::Json,
                routes: vec![
                    RouteEntry::new("Orders", "redis://localhost:6379", "orders-v1"),
                    RouteEntry::new("Audit", "redis://localhost:6379", "audit"),
                    RouteEntry::new("Orders", "redis://localhost:6379", "orders-v2"),
                ],
            },
            ..Default::default()
        };

        let forwarder = RoutedEventForwarder::from_config(&config).unwrap();
        assert_eq!(forwarder.routes().len(), 2);
        assert_eq!(forwarder.routes().get("Orders").unwrap().channel(), "orders-v2");
    }

    #[test]
    fn test_from_config_rejects_bad_connection_string() {
        let config = EventRouteConfig {
            routes: crate::config::RouteSettings::Loaded {
                source: crate::config::RouteSource::Json,
                routes: vec![RouteEntry::new("Orders", "not a url", "orders")],
            },
            ..Default::default()
        };

        assert!(matches!(
            RoutedEventForwarder::from_config(&config),
            Err(EventError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_build_forwarder_falls_back_to_noop() {
        let forwarder = build_forwarder(&EventRouteConfig::default());

        // A routed forwarder would reject an unknown event name
        forwarder.send("Unconfigured", "{}").await.unwrap();
    }
}
