use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One outbound route: logical event name to destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    #[serde(default)]
    pub event_name: String,
    /// Redis URL of the destination
    #[serde(default)]
    pub destination_connection: String,
    /// Stream key on the destination
    #[serde(default)]
    pub destination_channel: String,
}

impl RouteEntry {
    pub fn new(
        event_name: impl Into<String>,
        destination_connection: impl Into<String>,
        destination_channel: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            destination_connection: destination_connection.into(),
            destination_channel: destination_channel.into(),
        }
    }

    /// Name of the first blank field, if any.
    pub fn blank_field(&self) -> Option<&'static str> {
        [
            ("eventName", &self.event_name),
            ("destinationConnection", &self.destination_connection),
            ("destinationChannel", &self.destination_channel),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Shape of the raw JSON route source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRouteOptions {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Acknowledgement returned once a payload has been handed to the forwarder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SendStatus {
    #[schema(example = "Message sent to Event Hub route 'OutlayEvent'")]
    pub status: String,
}

impl SendStatus {
    pub fn routed(event_name: &str) -> Self {
        Self {
            status: format!("Message sent to Event Hub route '{}'", event_name),
        }
    }

    pub fn default_route() -> Self {
        Self {
            status: "Message sent to Event Hub".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_options_parse_camel_case() {
        let raw = r#"{"routes":[{"eventName":"OutlayEvent","destinationConnection":"redis://localhost:6379","destinationChannel":"outlay"}]}"#;
        let options: EventRouteOptions = serde_json::from_str(raw).unwrap();

        assert_eq!(
            options.routes,
            vec![RouteEntry::new("OutlayEvent", "redis://localhost:6379", "outlay")]
        );
    }

    #[test]
    fn test_blank_field_detection() {
        assert_eq!(RouteEntry::new("a", "redis://h", "c").blank_field(), None);
        assert_eq!(
            RouteEntry::new("a", "  ", "c").blank_field(),
            Some("destinationConnection")
        );
        assert_eq!(RouteEntry::default().blank_field(), Some("eventName"));
    }
}
