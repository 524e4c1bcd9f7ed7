//! Redis Streams destination against a real Redis container.
//!
//! Require Docker: `cargo test -p domain_events -- --ignored`

use domain_events::*;
use test_utils::TestRedis;

/// `body` field of every entry in `stream`, oldest first.
async fn stream_bodies(redis: &TestRedis, stream: &str) -> Vec<String> {
    let mut conn = redis.connection();
    let entries: Vec<(String, Vec<(String, String)>)> = redis::cmd("XRANGE")
        .arg(stream)
        .arg("-")
        .arg("+")
        .query_async(&mut conn)
        .await
        .unwrap();

    entries
        .into_iter()
        .flat_map(|(_, fields)| fields)
        .filter(|(field, _)| field == "body")
        .map(|(_, body)| body)
        .collect()
}

fn config_for(routes: Vec<RouteEntry>) -> EventRouteConfig {
    EventRouteConfig {
        routes: RouteSettings::Loaded {
            source: RouteSource::Json,
            routes,
        },
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn test_send_appends_to_configured_stream() {
    let redis = TestRedis::new().await;
    let url = redis.connection_string().to_string();

    let config = config_for(vec![
        RouteEntry::new("Orders", url.clone(), "orders"),
        RouteEntry::new("Audit", url.clone(), "audit"),
    ]);
    let forwarder = RoutedEventForwarder::from_config(&config).unwrap();

    forwarder.send("Orders", r#"{"id":1}"#).await.unwrap();
    forwarder.send("Orders", r#"{"id":2}"#).await.unwrap();

    assert_eq!(
        stream_bodies(&redis, "orders").await,
        vec![r#"{"id":1}"#.to_string(), r#"{"id":2}"#.to_string()]
    );
    assert!(stream_bodies(&redis, "audit").await.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_unreachable_destination_is_transport_error() {
    let config = config_for(vec![RouteEntry::new(
        "Orders",
        "redis://127.0.0.1:1",
        "orders",
    )]);
    let forwarder = RoutedEventForwarder::from_config(&config).unwrap();

    let err = forwarder.send("Orders", "{}").await.unwrap_err();
    assert!(matches!(err, EventError::Transport(_)));
}
