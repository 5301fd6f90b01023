//! Event trait and related types for the asynchronous audit trail.
//!
//! Every service publishes domain events (`login.attempted`, `risk.scored`,
//! `mfa.completed`) after its decision, fire-and-forget, for audit and future
//! ML retraining. These events are wire-format JSON — `application/json`,
//! `utf-8` — so they can be inspected on the broker and consumed by
//! non-Rust tooling, unlike a binary encoding.
//!
//! # Example
//!
//! ```
//! use amfa_core::event::Event;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! enum AuthEvent {
//!     LoginAttempted { event_id: String, was_successful: bool },
//! }
//!
//! impl Event for AuthEvent {
//!     fn event_type(&self) -> &'static str {
//!         match self {
//!             AuthEvent::LoginAttempted { .. } => "login.attempted",
//!         }
//!     }
//! }
//! ```

use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error;

/// Error types for event operations.
#[derive(Error, Debug)]
pub enum EventError {
    /// Failed to serialize event to bytes.
    #[error("Failed to serialize event: {0}")]
    SerializationError(String),

    /// Failed to deserialize event from bytes.
    #[error("Failed to deserialize event: {0}")]
    DeserializationError(String),

    /// Unknown event type encountered during deserialization.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
}

/// A domain event published to the audit bus.
///
/// # Event Naming Convention
///
/// `event_type()` returns the routing key used on the bus, e.g.
/// `"login.attempted"`, `"risk.scored"`, `"mfa.completed"` (§4.5).
///
/// # Serialization
///
/// Events are serialized as JSON. The trait provides default
/// implementations for any type implementing `Serialize` /
/// `DeserializeOwned`.
pub trait Event: Send + Sync + 'static {
    /// Returns the routing key / event type identifier for this event.
    fn event_type(&self) -> &'static str;

    /// Serialize this event to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be
    /// serialized.
    fn to_bytes(&self) -> Result<Vec<u8>, EventError>
    where
        Self: Serialize,
    {
        serde_json::to_vec(self).map_err(|e| EventError::SerializationError(e.to_string()))
    }

    /// Deserialize an event from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns `EventError::DeserializationError` if the bytes cannot be
    /// deserialized into this event type.
    fn from_bytes(bytes: &[u8]) -> Result<Self, EventError>
    where
        Self: DeserializeOwned + Sized,
    {
        serde_json::from_slice(bytes).map_err(|e| EventError::DeserializationError(e.to_string()))
    }
}

/// A serialized event ready for publication to the bus.
#[derive(Clone, Debug)]
pub struct SerializedEvent {
    /// The event type / routing key (e.g. `"login.attempted"`).
    pub event_type: String,

    /// The JSON-serialized event body.
    pub data: Vec<u8>,

    /// Optional metadata, e.g. `correlation_id` (the `event_id`), `timestamp`.
    pub metadata: Option<serde_json::Value>,
}

impl SerializedEvent {
    /// Create a new serialized event.
    #[must_use]
    pub const fn new(
        event_type: String,
        data: Vec<u8>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            event_type,
            data,
            metadata,
        }
    }

    /// Create a serialized event from an `Event` trait object.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SerializationError` if the event cannot be
    /// serialized.
    pub fn from_event<E: Event + Serialize>(
        event: &E,
        metadata: Option<serde_json::Value>,
    ) -> Result<Self, EventError> {
        Ok(Self {
            event_type: event.event_type().to_string(),
            data: event.to_bytes()?,
            metadata,
        })
    }
}

impl fmt::Display for SerializedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerializedEvent {{ type: {}, size: {} bytes }}",
            self.event_type,
            self.data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
    enum TestEvent {
        Created { id: String, value: i32 },
        Updated { id: String, new_value: i32 },
    }

    impl Event for TestEvent {
        fn event_type(&self) -> &'static str {
            match self {
                TestEvent::Created { .. } => "test.created",
                TestEvent::Updated { .. } => "test.updated",
            }
        }
    }

    #[test]
    fn event_type_returns_correct_identifier() {
        let event = TestEvent::Created {
            id: "test-1".to_string(),
            value: 42,
        };
        assert_eq!(event.event_type(), "test.created");
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn event_serialization_roundtrip() {
        let event = TestEvent::Created {
            id: "test-1".to_string(),
            value: 42,
        };

        let bytes = event.to_bytes().expect("serialization should succeed");
        let deserialized = TestEvent::from_bytes(&bytes).expect("deserialization should succeed");

        assert_eq!(event, deserialized);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn event_bytes_are_human_readable_json() {
        let event = TestEvent::Created {
            id: "test-1".to_string(),
            value: 42,
        };
        let bytes = event.to_bytes().expect("serialization should succeed");
        let text = String::from_utf8(bytes).expect("json bytes should be valid utf-8");
        assert!(text.contains("\"Created\""));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn serialized_event_from_event() {
        let event = TestEvent::Updated {
            id: "test-1".to_string(),
            new_value: 100,
        };

        let metadata = serde_json::json!({
            "correlation_id": "corr-456"
        });

        let serialized = SerializedEvent::from_event(&event, Some(metadata.clone()))
            .expect("serialization should succeed");

        assert_eq!(serialized.event_type, "test.updated");
        assert!(!serialized.data.is_empty());
        assert_eq!(serialized.metadata, Some(metadata));
    }

    #[test]
    fn serialized_event_display() {
        let serialized =
            SerializedEvent::new("test.v1".to_string(), vec![1, 2, 3, 4, 5], None);

        let display = format!("{serialized}");
        assert!(display.contains("test.v1"));
        assert!(display.contains("5 bytes"));
    }
}
