//! Events Domain
//!
//! Forwards arbitrary JSON payloads to named outbound routes. Each route maps
//! a logical event name to a Redis Streams destination (connection URL plus
//! stream key). The route table is built once at startup and read-only
//! afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Handlers     │  ← POST /eventhub/{event_name}/send, POST /events/send
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ EventForwarder  │  ← Routed (route table) or NoOp (logs and succeeds)
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │   RouteTable    │  ← event name → destination, last entry wins
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ EventDestination│  ← Redis Streams: pipelined XADD per batch
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::FromEnv;
//! use domain_events::{build_forwarder, handlers, EventRouteConfig};
//!
//! let config = EventRouteConfig::from_env().unwrap();
//! let forwarder = build_forwarder(&config);
//! let router = handlers::router(forwarder, config.default_event_name.clone());
//! ```

pub mod batch;
pub mod config;
pub mod destination;
pub mod error;
pub mod forwarder;
pub mod handlers;
pub mod models;
pub mod redis_stream;
pub mod route_table;

pub use batch::EventBatch;
pub use config::{EventRouteConfig, RouteSettings, RouteSource};
pub use destination::EventDestination;
pub use error::{EventError, EventResult};
pub use forwarder::{build_forwarder, EventForwarder, NoOpEventForwarder, RoutedEventForwarder};
pub use handlers::ApiDoc;
pub use models::{EventRouteOptions, RouteEntry, SendStatus};
pub use redis_stream::{RedisConnections, RedisStreamDestination};
pub use route_table::RouteTable;
